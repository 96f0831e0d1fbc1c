use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{DbErr, SqlErr};
use tracing::debug;

use crate::constraints::{self, ConstraintKind};

/// The kind of statement a failed write was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Insert,
    Update,
    Delete,
}

/// Where a rejected write happened. SQLite does not name foreign keys in its
/// errors, so the table and statement kind are needed to attribute them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteContext {
    pub table: &'static str,
    pub op: WriteOp,
}

impl WriteContext {
    pub const fn insert(table: &'static str) -> Self {
        Self {
            table,
            op: WriteOp::Insert,
        }
    }

    pub const fn update(table: &'static str) -> Self {
        Self {
            table,
            op: WriteOp::Update,
        }
    }

    pub const fn delete(table: &'static str) -> Self {
        Self {
            table,
            op: WriteOp::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ReferentialReason {
    /// A dependent row points at a parent that does not exist.
    MissingParent,
    /// A parent row cannot be deleted while dependents reference it.
    RestrictedDelete,
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Constraint violation: {constraint} ({kind})")]
    ConstraintViolation {
        constraint: String,
        kind: ConstraintKind,
    },

    #[error(
        "Referential violation ({reason}): {}",
        .constraint.as_deref().unwrap_or("unnamed foreign key")
    )]
    ReferentialViolation {
        constraint: Option<String>,
        reason: ReferentialReason,
    },

    /// A price ledger key that does not follow the service's newest entry.
    #[error("Price history id {id} does not follow the latest entry {latest}")]
    LedgerOutOfOrder { id: i32, latest: i32 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

static PG_CHECK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"violates check constraint "([^"]+)""#).expect("valid regex"));
static PG_UNIQUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"violates unique constraint "([^"]+)""#).expect("valid regex"));
static PG_FOREIGN_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"violates foreign key constraint "([^"]+)""#).expect("valid regex"));
static PG_NOT_NULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"null value in column "([^"]+)"(?: of relation "([^"]+)")? violates not-null constraint"#)
        .expect("valid regex")
});
static SQLITE_CHECK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CHECK constraint failed: (\w+)").expect("valid regex"));
static SQLITE_UNIQUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"UNIQUE constraint failed: (\w+\.\w+(?:, \w+\.\w+)*)").expect("valid regex")
});
static SQLITE_NOT_NULL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"NOT NULL constraint failed: (\w+)\.(\w+)").expect("valid regex"));

impl SchemaError {
    /// Maps an engine rejection onto the constraint it violated.
    ///
    /// Errors that are not integrity violations (connectivity, syntax,
    /// missing tables) pass through as [`SchemaError::DatabaseError`].
    pub fn classify(err: DbErr, ctx: WriteContext) -> Self {
        let message = err.to_string();
        let foreign_key = matches!(
            err.sql_err(),
            Some(SqlErr::ForeignKeyConstraintViolation(_))
        );
        match classify_message(&message, foreign_key, ctx) {
            Some(classified) => {
                debug!(table = ctx.table, op = ?ctx.op, error = %classified, "write rejected");
                classified
            }
            None => SchemaError::DatabaseError(err),
        }
    }

    /// Name of the violated constraint, when one is known.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            SchemaError::ConstraintViolation { constraint, .. } => Some(constraint),
            SchemaError::ReferentialViolation { constraint, .. } => constraint.as_deref(),
            _ => None,
        }
    }

    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            SchemaError::ConstraintViolation { .. }
                | SchemaError::ReferentialViolation { .. }
                | SchemaError::LedgerOutOfOrder { .. }
        )
    }
}

fn classify_message(message: &str, foreign_key: bool, ctx: WriteContext) -> Option<SchemaError> {
    if let Some(name) = capture(&PG_CHECK, message).or_else(|| capture(&SQLITE_CHECK, message)) {
        return Some(named(name, ConstraintKind::Pattern));
    }

    if let Some(name) = capture(&PG_UNIQUE, message) {
        return Some(named(name, ConstraintKind::Unique));
    }

    if let Some(caps) = SQLITE_UNIQUE.captures(message) {
        let qualified: Vec<&str> = caps[1].split(", ").collect();
        let table = qualified
            .first()
            .and_then(|q| q.split_once('.'))
            .map(|(t, _)| t)
            .unwrap_or(ctx.table);
        let columns: Vec<&str> = qualified
            .iter()
            .filter_map(|q| q.split_once('.').map(|(_, c)| c))
            .collect();
        return Some(by_columns(table, &columns, ConstraintKind::Unique));
    }

    if let Some(caps) = PG_NOT_NULL.captures(message) {
        let table = caps.get(2).map(|m| m.as_str()).unwrap_or(ctx.table);
        return Some(by_columns(table, &[&caps[1]], ConstraintKind::NotNull));
    }

    if let Some(caps) = SQLITE_NOT_NULL.captures(message) {
        return Some(by_columns(&caps[1], &[&caps[2]], ConstraintKind::NotNull));
    }

    if let Some(name) = capture(&PG_FOREIGN_KEY, message) {
        let reason = if message.contains("update or delete on table") {
            ReferentialReason::RestrictedDelete
        } else {
            ReferentialReason::MissingParent
        };
        return Some(SchemaError::ReferentialViolation {
            constraint: Some(name.to_string()),
            reason,
        });
    }

    if foreign_key || message.contains("FOREIGN KEY constraint failed") {
        let (reason, candidates): (_, Vec<_>) = match ctx.op {
            WriteOp::Delete => (
                ReferentialReason::RestrictedDelete,
                constraints::restricting_references_to(ctx.table).collect(),
            ),
            WriteOp::Insert | WriteOp::Update => (
                ReferentialReason::MissingParent,
                constraints::foreign_keys_from(ctx.table).collect(),
            ),
        };
        let constraint = match candidates.as_slice() {
            [only] => Some(only.name.to_string()),
            _ => None,
        };
        return Some(SchemaError::ReferentialViolation { constraint, reason });
    }

    None
}

fn capture<'m>(re: &Regex, message: &'m str) -> Option<&'m str> {
    re.captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn named(name: &str, fallback: ConstraintKind) -> SchemaError {
    let kind = constraints::by_name(name)
        .map(|def| def.kind)
        .unwrap_or(fallback);
    SchemaError::ConstraintViolation {
        constraint: name.to_string(),
        kind,
    }
}

fn by_columns(table: &str, columns: &[&str], kind: ConstraintKind) -> SchemaError {
    match constraints::by_columns(table, columns, kind) {
        Some(def) => SchemaError::ConstraintViolation {
            constraint: def.name.to_string(),
            kind: def.kind,
        },
        None => SchemaError::ConstraintViolation {
            constraint: format!("{table}({})", columns.join(", ")),
            kind,
        },
    }
}
