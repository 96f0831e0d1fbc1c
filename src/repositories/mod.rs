use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;

use crate::errors::{SchemaError, WriteContext};

pub mod account_repository;
pub mod ban_list_repository;
pub mod basket_repository;
pub mod company_repository;
pub mod service_repository;

pub use account_repository::{AccountRepository, NewAccount};
pub use ban_list_repository::BanListRepository;
pub use basket_repository::BasketRepository;
pub use company_repository::{CompanyRepository, NewService};
pub use service_repository::ServiceRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// All repositories over one shared pool.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub accounts: AccountRepository,
    pub bans: BanListRepository,
    pub companies: CompanyRepository,
    pub services: ServiceRepository,
    pub baskets: BasketRepository,
}

impl Repositories {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            bans: BanListRepository::new(db.clone()),
            companies: CompanyRepository::new(db.clone()),
            services: ServiceRepository::new(db.clone()),
            baskets: BasketRepository::new(db),
        }
    }
}

/// Error mapper for a write against `ctx`.
pub(crate) fn rejected(ctx: WriteContext) -> impl FnOnce(DbErr) -> SchemaError {
    move |err| SchemaError::classify(err, ctx)
}
