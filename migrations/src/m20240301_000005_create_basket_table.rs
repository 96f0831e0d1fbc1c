use sea_orm_migration::prelude::*;

use crate::checks::Check;
use crate::columns::utc_now;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        manager
            .create_table(
                Table::create()
                    .table(Basket::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Basket::AccId).integer().not_null())
                    .col(ColumnDef::new(Basket::Name).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Basket::Type)
                            .string_len(50)
                            .not_null()
                            .extra(Check::BasketType.clause(backend)?),
                    )
                    .col(
                        ColumnDef::new(Basket::Time)
                            .date_time()
                            .not_null()
                            .default(utc_now(backend)),
                    )
                    .primary_key(
                        Index::create()
                            .name("pkey_basket")
                            .col(Basket::AccId)
                            .col(Basket::Name),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fkey_acc")
                            .from(Basket::Table, Basket::AccId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Basket::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Basket {
    Table,
    AccId,
    Name,
    Type,
    Time,
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
}
