pub mod transaction;

use crate::config::AppConfig;
use crate::errors::SchemaError;
use metrics::{counter, gauge, histogram};
use migrations::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub use transaction::with_transaction;

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
    /// Log every statement through sqlx
    pub sqlx_logging: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
            sqlx_logging: false,
        }
    }
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// `sqlite::memory:` gives every pooled connection its own database, so
    /// in-memory URLs are pinned to a single connection.
    fn effective_max_connections(&self) -> u32 {
        if self.url.contains(":memory:") || self.url.contains("mode=memory") {
            1
        } else {
            self.max_connections
        }
    }
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
            sqlx_logging: cfg.sqlx_logging,
        }
    }
}

/// Establishes a connection pool to the database
///
/// # Errors
/// Returns a `SchemaError` if the connection cannot be established
pub async fn establish_connection(database_url: &str) -> Result<DbPool, SchemaError> {
    establish_connection_with_config(&DbConfig::new(database_url)).await
}

/// Establishes a connection pool to the database with custom configuration
///
/// sqlx opens every SQLite connection with `PRAGMA foreign_keys = ON`, which
/// every referential rule of the schema relies on.
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, SchemaError> {
    debug!("Configuring database connection with: {:?}", config);

    let max_connections = config.effective_max_connections();
    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(max_connections)
        .min_connections(config.min_connections.min(max_connections))
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(config.sqlx_logging);

    gauge!("marketplace_db.max_connections", max_connections as f64);
    info!("Connecting to database with max_connections={}", max_connections);

    let pool = Database::connect(opt).await.map_err(|e| {
        error!("Database connection failed: {}", e);
        counter!("marketplace_db.connection_failures", 1);
        SchemaError::DatabaseError(e)
    })?;

    info!("Database connection pool established successfully");
    Ok(pool)
}

/// Establish DB pool using AppConfig tuning
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, SchemaError> {
    let db_cfg: DbConfig = cfg.into();
    let pool = establish_connection_with_config(&db_cfg).await?;
    if cfg.auto_migrate {
        run_migrations(&pool).await?;
    }
    Ok(pool)
}

/// Applies every pending migration.
pub async fn run_migrations(pool: &DbPool) -> Result<(), SchemaError> {
    apply_migrations(pool, None).await
}

/// Applies up to `steps` pending migrations, or all of them.
pub async fn apply_migrations(pool: &DbPool, steps: Option<u32>) -> Result<(), SchemaError> {
    info!(?steps, "Running database migrations");
    let start = Instant::now();

    let result = Migrator::up(pool, steps).await;

    let elapsed = start.elapsed();
    histogram!("marketplace_db.migration.duration", elapsed);
    match &result {
        Ok(_) => info!("Database migrations completed successfully in {:?}", elapsed),
        Err(e) => error!("Database migrations failed after {:?}: {}", elapsed, e),
    }

    result.map_err(SchemaError::DatabaseError)
}

/// Reverts the last `steps` applied migrations, or all of them.
///
/// Tables are dropped in reverse creation order so that no foreign key is
/// left pointing at a dropped parent.
pub async fn rollback_migrations(pool: &DbPool, steps: Option<u32>) -> Result<(), SchemaError> {
    warn!(?steps, "Rolling back database migrations");
    Migrator::down(pool, steps).await.map_err(|e| {
        error!("Migration rollback failed: {}", e);
        SchemaError::DatabaseError(e)
    })
}

/// Drops everything the migrator knows about and rebuilds the schema.
pub async fn reset_schema(pool: &DbPool) -> Result<(), SchemaError> {
    warn!("Resetting database schema");
    Migrator::refresh(pool).await.map_err(SchemaError::DatabaseError)
}

/// Names of migrations that have not been applied yet.
pub async fn pending_migrations(pool: &DbPool) -> Result<Vec<String>, SchemaError> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    Ok(pending.iter().map(|m| m.name().to_string()).collect())
}

pub async fn applied_migrations(pool: &DbPool) -> Result<Vec<String>, SchemaError> {
    let applied = Migrator::get_applied_migrations(pool).await?;
    Ok(applied.iter().map(|m| m.name().to_string()).collect())
}

/// Checks if the database connection is active
pub async fn check_connection(pool: &DbPool) -> Result<(), SchemaError> {
    debug!("Checking database connection");
    let start = Instant::now();

    let result = pool.ping().await.map_err(SchemaError::DatabaseError);

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => {
            debug!("Database connection check successful in {:?}", elapsed);
            gauge!("marketplace_db.connection_latency", elapsed.as_millis() as f64);
        }
        Err(e) => {
            error!("Database connection check failed after {:?}: {}", elapsed, e);
            counter!("marketplace_db.connection_failures", 1);
        }
    }

    result
}

/// Closes the database connection pool
pub async fn close_pool(pool: DbPool) -> Result<(), SchemaError> {
    info!("Closing database connection pool");
    pool.close().await.map_err(SchemaError::DatabaseError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, DbBackend, Statement, TransactionTrait};

    #[test]
    fn in_memory_urls_use_a_single_connection() {
        assert_eq!(DbConfig::new("sqlite::memory:").effective_max_connections(), 1);
        assert_eq!(
            DbConfig::new("sqlite:file:test?mode=memory&cache=shared").effective_max_connections(),
            1
        );
        assert_eq!(DbConfig::new("postgres://localhost/market").effective_max_connections(), 10);
    }

    #[tokio::test]
    async fn migrations_apply_and_report_nothing_pending() {
        let pool = establish_connection("sqlite::memory:").await.unwrap();
        assert_eq!(pending_migrations(&pool).await.unwrap().len(), 6);

        run_migrations(&pool).await.unwrap();
        assert!(pending_migrations(&pool).await.unwrap().is_empty());
        check_connection(&pool).await.unwrap();

        rollback_migrations(&pool, Some(1)).await.unwrap();
        assert_eq!(
            pending_migrations(&pool).await.unwrap(),
            ["m20240301_000006_create_price_history_table"]
        );
        close_pool(pool).await.unwrap();
    }

    #[tokio::test]
    async fn every_pooled_sqlite_connection_enforces_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DbConfig::new(format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("market.db").display()
        ));
        config.max_connections = 3;
        let pool = establish_connection_with_config(&config).await.unwrap();

        // Open transactions hold their connections, so each one is distinct.
        let mut open = Vec::new();
        for _ in 0..3 {
            open.push(pool.begin().await.unwrap());
        }
        for txn in &open {
            let row = txn
                .query_one(Statement::from_string(
                    DbBackend::Sqlite,
                    "PRAGMA foreign_keys".to_string(),
                ))
                .await
                .unwrap()
                .unwrap();
            let enabled: i32 = row.try_get_by_index(0).unwrap();
            assert_eq!(enabled, 1);
        }
        for txn in open {
            txn.rollback().await.unwrap();
        }
        close_pool(pool).await.unwrap();
    }
}
