pub use sea_orm_migration::prelude::*;

pub mod checks;
pub mod columns;

mod m20240301_000001_create_account_table;
mod m20240301_000002_create_ban_list_table;
mod m20240301_000003_create_company_table;
mod m20240301_000004_create_service_table;
mod m20240301_000005_create_basket_table;
mod m20240301_000006_create_price_history_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        // Parents before children: foreign keys are declared inline.
        vec![
            Box::new(m20240301_000001_create_account_table::Migration),
            Box::new(m20240301_000002_create_ban_list_table::Migration),
            Box::new(m20240301_000003_create_company_table::Migration),
            Box::new(m20240301_000004_create_service_table::Migration),
            Box::new(m20240301_000005_create_basket_table::Migration),
            Box::new(m20240301_000006_create_price_history_table::Migration),
        ]
    }
}
