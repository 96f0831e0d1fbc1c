/*!
 * Transaction helper
 *
 * Runs a unit of work inside a database transaction, committing on success
 * and rolling back on any error.
 */

use metrics::counter;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionError, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Type alias for boxed future used in transactions
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Execute a function within a database transaction
///
/// The closure's own error type comes back unchanged, so integrity
/// violations classified inside the transaction keep their constraint names.
///
/// ```rust,ignore
/// with_transaction(&db, |txn| {
///     Box::pin(async move {
///         company::Entity::insert(company).exec(txn).await?;
///         service::Entity::insert_many(services).exec(txn).await?;
///         Ok(())
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<F, T, E>(db: &DatabaseConnection, f: F) -> Result<T, E>
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> BoxFuture<'a, Result<T, E>> + Send,
    T: Send,
    E: std::error::Error + From<DbErr> + Send,
{
    let result = db.transaction(f).await;

    match &result {
        Ok(_) => {
            counter!("marketplace_db.transaction.committed", 1);
            debug!("Transaction committed");
        }
        Err(e) => {
            counter!("marketplace_db.transaction.rolled_back", 1);
            warn!("Transaction rolled back: {}", e);
        }
    }

    result.map_err(|e| match e {
        TransactionError::Connection(db_err) => E::from(db_err),
        TransactionError::Transaction(err) => err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchemaError;
    use crate::db::establish_connection;
    use sea_orm::{ConnectionTrait, Statement};

    async fn count(db: &DatabaseConnection) -> i64 {
        let row = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM t",
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    #[tokio::test]
    async fn errors_roll_back_and_keep_their_type() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        db.execute_unprepared("CREATE TABLE t (x INTEGER)").await.unwrap();

        let result: Result<(), SchemaError> = with_transaction(&db, |txn| {
            Box::pin(async move {
                txn.execute_unprepared("INSERT INTO t VALUES (1)").await?;
                Err(SchemaError::NotFound("second row".into()))
            })
        })
        .await;

        assert!(matches!(result, Err(SchemaError::NotFound(_))));
        assert_eq!(count(&db).await, 0);

        with_transaction::<_, _, SchemaError>(&db, |txn| {
            Box::pin(async move {
                txn.execute_unprepared("INSERT INTO t VALUES (1)").await?;
                Ok(())
            })
        })
        .await
        .unwrap();
        assert_eq!(count(&db).await, 1);
    }
}
