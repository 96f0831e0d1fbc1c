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
                    .table(Account::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Account::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Account::Login)
                            .string_len(50)
                            .extra(Check::Login.clause(backend)?),
                    )
                    .col(
                        ColumnDef::new(Account::Password)
                            .string_len(200)
                            .extra(Check::Password.clause(backend)?),
                    )
                    .col(
                        ColumnDef::new(Account::MobNum)
                            .string_len(50)
                            .default("+999(99)999-99-99")
                            .extra(Check::MobileNumber.clause(backend)?),
                    )
                    .col(
                        ColumnDef::new(Account::Email)
                            .string_len(50)
                            .default("myemail@domain.com")
                            .extra(Check::Email.clause(backend)?),
                    )
                    .col(
                        ColumnDef::new(Account::Rolename)
                            .string_len(50)
                            .default("USER")
                            .extra(Check::Rolename.clause(backend)?),
                    )
                    .index(
                        Index::create()
                            .name("uq_account_login")
                            .col(Account::Login)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
    Login,
    Password,
    MobNum,
    Email,
    Rolename,
}
