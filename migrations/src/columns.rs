//! Column shapes whose SQL differs between engines.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

/// A NOT NULL integer key the caller always supplies.
///
/// SQLite turns a column declared exactly `INTEGER` under a primary key into
/// a rowid alias and fills it in when an insert omits it. `INT` has the same
/// affinity without the aliasing, so a missing key fails `NOT NULL`.
pub fn caller_assigned_key<T: IntoIden>(backend: DatabaseBackend, name: T) -> ColumnDef {
    let mut column = ColumnDef::new(name);
    match backend {
        DatabaseBackend::Sqlite => column.custom(Alias::new("INT")),
        _ => column.integer(),
    };
    column.not_null().to_owned()
}

/// Default for `timestamp` columns that hold UTC wall-clock time.
///
/// PostgreSQL's `CURRENT_TIMESTAMP` is a `timestamptz`; stored into a plain
/// `timestamp` it is converted to the session time zone, so it is shifted to
/// UTC first. SQLite's `CURRENT_TIMESTAMP` is already UTC.
pub fn utc_now(backend: DatabaseBackend) -> SimpleExpr {
    match backend {
        DatabaseBackend::Postgres => Expr::cust("(CURRENT_TIMESTAMP AT TIME ZONE 'UTC')"),
        _ => Expr::current_timestamp().into(),
    }
}
