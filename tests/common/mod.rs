#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, ExecResult, Statement};
use marketplace_schema::{
    config::AppConfig,
    db,
    entities::AccountModel,
    repositories::{NewAccount, Repositories},
};

/// Migrated in-memory SQLite database with repositories over it.
pub struct TestDb {
    pub db: Arc<DatabaseConnection>,
    pub repos: Repositories,
}

impl TestDb {
    /// Construct a fresh database with the full schema applied.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:".to_string(), "test".to_string());
        cfg.auto_migrate = true;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        let db = Arc::new(pool);

        Self {
            repos: Repositories::new(db.clone()),
            db,
        }
    }

    pub async fn exec(&self, sql: &str) -> Result<ExecResult, DbErr> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                sql.to_string(),
            ))
            .await
    }

    pub async fn count(&self, table: &str) -> i64 {
        let row = self
            .db
            .query_one(Statement::from_string(
                self.db.get_database_backend(),
                format!("SELECT COUNT(*) AS n FROM {table}"),
            ))
            .await
            .expect("count query")
            .expect("count row");
        row.try_get("", "n").expect("count value")
    }

    /// Names of the user tables currently present.
    pub async fn tables(&self) -> Vec<String> {
        let rows = self
            .db
            .query_all(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT name FROM sqlite_master WHERE type = 'table' \
                 AND name NOT LIKE 'sqlite_%' AND name <> 'seaql_migrations' ORDER BY name"
                    .to_string(),
            ))
            .await
            .expect("table listing");
        rows.iter()
            .map(|row| row.try_get::<String>("", "name").expect("table name"))
            .collect()
    }

    pub async fn account(&self, login: &str) -> AccountModel {
        self.repos
            .accounts
            .create(NewAccount::new(login, password()))
            .await
            .expect("create account")
    }
}

/// A password accepted by `ch_password`.
pub fn password() -> String {
    "correct horse battery staple ".repeat(4)
}

pub fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .expect("valid date")
        .and_hms_opt(hour, 0, 0)
        .expect("valid time")
}
