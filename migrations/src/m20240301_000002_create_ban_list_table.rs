use sea_orm_migration::prelude::*;

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
                    .table(BanList::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BanList::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BanList::AccId).integer().not_null())
                    .col(
                        ColumnDef::new(BanList::Started)
                            .date_time()
                            .not_null()
                            .default(utc_now(backend)),
                    )
                    // No default: a ban is only written once its end is known.
                    .col(ColumnDef::new(BanList::Ended).date_time().not_null())
                    .index(
                        Index::create()
                            .name("uq_ban_list_acc_id")
                            .col(BanList::AccId)
                            .unique(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fkey_account")
                            .from(BanList::Table, BanList::AccId)
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
            .drop_table(Table::drop().table(BanList::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BanList {
    Table,
    Id,
    AccId,
    Started,
    Ended,
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
}
