use sea_orm_migration::prelude::*;

use crate::checks::Check;
use crate::columns::caller_assigned_key;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // Company ids are assigned by the caller, never generated here.
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(&mut caller_assigned_key(backend, Company::Id))
                    .col(
                        ColumnDef::new(Company::CompanyName)
                            .string_len(50)
                            .extra(Check::CompanyName.clause(backend)?),
                    )
                    .primary_key(Index::create().name("pk_company").col(Company::Id))
                    .index(
                        Index::create()
                            .name("uq_company_name")
                            .col(Company::CompanyName)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Company::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Company {
    Table,
    Id,
    CompanyName,
}
