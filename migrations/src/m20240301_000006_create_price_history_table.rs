use sea_orm_migration::prelude::*;

use crate::columns::caller_assigned_key;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // Ids are caller-assigned; history rows are appended, never rewritten.
        manager
            .create_table(
                Table::create()
                    .table(PriceHistory::Table)
                    .if_not_exists()
                    .col(&mut caller_assigned_key(backend, PriceHistory::Id))
                    .col(
                        ColumnDef::new(PriceHistory::ServiceName)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceHistory::CompanyName)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceHistory::Price)
                            .decimal_len(8, 2)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_price_history")
                            .col(PriceHistory::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fkey_sprice")
                            .from(
                                PriceHistory::Table,
                                (PriceHistory::ServiceName, PriceHistory::CompanyName),
                            )
                            .to(Service::Table, (Service::ServiceName, Service::CompanyName))
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
                    .name("idx_price_history_service")
                    .table(PriceHistory::Table)
                    .col(PriceHistory::ServiceName)
                    .col(PriceHistory::CompanyName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PriceHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PriceHistory {
    Table,
    Id,
    ServiceName,
    CompanyName,
    Price,
}

#[derive(DeriveIden)]
enum Service {
    Table,
    ServiceName,
    CompanyName,
}
