use sea_orm_migration::prelude::*;

use crate::checks::Check;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Service::ServiceName)
                            .string_len(50)
                            .not_null()
                            .extra(Check::ServiceName.clause(backend)?),
                    )
                    .col(ColumnDef::new(Service::Price).decimal_len(8, 2).not_null())
                    .col(ColumnDef::new(Service::CompanyName).string_len(50).not_null())
                    .primary_key(
                        Index::create()
                            .name("pkey_service")
                            .col(Service::ServiceName)
                            .col(Service::CompanyName),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fkey_company")
                            .from(Service::Table, Service::CompanyName)
                            .to(Company::Table, Company::CompanyName)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_service_company_name")
                    .table(Service::Table)
                    .col(Service::CompanyName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Service::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    ServiceName,
    Price,
    CompanyName,
}

#[derive(DeriveIden)]
enum Company {
    Table,
    CompanyName,
}
