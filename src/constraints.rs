//! Catalog of every named integrity rule the schema declares.
//!
//! Engines disagree on how much they say when a write is rejected: PostgreSQL
//! names the constraint, SQLite reports the table and columns (or nothing at
//! all for foreign keys). The catalog lets both be resolved to the same name.

use migrations::checks::Check;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConstraintKind {
    Pattern,
    Unique,
    PrimaryKey,
    Enumeration,
    NotNull,
    ForeignKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    Restrict,
}

/// Parent side of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintDef {
    pub name: &'static str,
    pub kind: ConstraintKind,
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub references: Option<Reference>,
}

const fn check(
    check: Check,
    kind: ConstraintKind,
    table: &'static str,
    columns: &'static [&'static str],
) -> ConstraintDef {
    ConstraintDef {
        name: check.name(),
        kind,
        table,
        columns,
        references: None,
    }
}

const fn plain(
    name: &'static str,
    kind: ConstraintKind,
    table: &'static str,
    columns: &'static [&'static str],
) -> ConstraintDef {
    ConstraintDef {
        name,
        kind,
        table,
        columns,
        references: None,
    }
}

const fn foreign(
    name: &'static str,
    table: &'static str,
    columns: &'static [&'static str],
    references: Reference,
) -> ConstraintDef {
    ConstraintDef {
        name,
        kind: ConstraintKind::ForeignKey,
        table,
        columns,
        references: Some(references),
    }
}

use ConstraintKind::*;
use ReferentialAction::*;

pub static CONSTRAINTS: &[ConstraintDef] = &[
    // account
    plain("account_pkey", PrimaryKey, "account", &["id"]),
    plain("uq_account_login", Unique, "account", &["login"]),
    check(Check::Login, Pattern, "account", &["login"]),
    check(Check::Password, Pattern, "account", &["password"]),
    check(Check::MobileNumber, Pattern, "account", &["mob_num"]),
    check(Check::Email, Pattern, "account", &["email"]),
    check(Check::Rolename, Enumeration, "account", &["rolename"]),
    // ban_list
    plain("ban_list_pkey", PrimaryKey, "ban_list", &["id"]),
    plain("uq_ban_list_acc_id", Unique, "ban_list", &["acc_id"]),
    plain("nn_ban_list_acc_id", NotNull, "ban_list", &["acc_id"]),
    plain("nn_ban_list_started", NotNull, "ban_list", &["started"]),
    plain("nn_ban_list_ended", NotNull, "ban_list", &["ended"]),
    foreign(
        "fkey_account",
        "ban_list",
        &["acc_id"],
        Reference {
            table: "account",
            columns: &["id"],
            on_delete: Restrict,
            on_update: Cascade,
        },
    ),
    // company
    plain("pk_company", PrimaryKey, "company", &["id"]),
    plain("nn_company_id", NotNull, "company", &["id"]),
    plain("uq_company_name", Unique, "company", &["company_name"]),
    check(Check::CompanyName, Pattern, "company", &["company_name"]),
    // service
    plain("pkey_service", PrimaryKey, "service", &["service_name", "company_name"]),
    check(Check::ServiceName, Pattern, "service", &["service_name"]),
    plain("nn_service_service_name", NotNull, "service", &["service_name"]),
    plain("nn_service_company_name", NotNull, "service", &["company_name"]),
    plain("nn_service_price", NotNull, "service", &["price"]),
    foreign(
        "fkey_company",
        "service",
        &["company_name"],
        Reference {
            table: "company",
            columns: &["company_name"],
            on_delete: Cascade,
            on_update: Cascade,
        },
    ),
    // basket
    plain("pkey_basket", PrimaryKey, "basket", &["acc_id", "name"]),
    check(Check::BasketType, Enumeration, "basket", &["type"]),
    plain("nn_basket_acc_id", NotNull, "basket", &["acc_id"]),
    plain("nn_basket_name", NotNull, "basket", &["name"]),
    plain("nn_basket_type", NotNull, "basket", &["type"]),
    plain("nn_basket_time", NotNull, "basket", &["time"]),
    foreign(
        "fkey_acc",
        "basket",
        &["acc_id"],
        Reference {
            table: "account",
            columns: &["id"],
            on_delete: Restrict,
            on_update: Cascade,
        },
    ),
    // price_history
    plain("pk_price_history", PrimaryKey, "price_history", &["id"]),
    plain("nn_price_history_id", NotNull, "price_history", &["id"]),
    plain("nn_price_history_service_name", NotNull, "price_history", &["service_name"]),
    plain("nn_price_history_company_name", NotNull, "price_history", &["company_name"]),
    plain("nn_price_history_price", NotNull, "price_history", &["price"]),
    foreign(
        "fkey_sprice",
        "price_history",
        &["service_name", "company_name"],
        Reference {
            table: "service",
            columns: &["service_name", "company_name"],
            on_delete: Cascade,
            on_update: Cascade,
        },
    ),
];

pub fn by_name(name: &str) -> Option<&'static ConstraintDef> {
    CONSTRAINTS.iter().find(|c| c.name == name)
}

/// Finds the uniqueness-style constraint (unique or primary key) or not-null
/// rule covering exactly `columns` on `table`.
pub fn by_columns(
    table: &str,
    columns: &[&str],
    kind: ConstraintKind,
) -> Option<&'static ConstraintDef> {
    CONSTRAINTS.iter().find(|c| {
        c.table == table
            && c.columns.len() == columns.len()
            && c.columns.iter().zip(columns).all(|(a, b)| a == b)
            && match kind {
                Unique | PrimaryKey => matches!(c.kind, Unique | PrimaryKey),
                other => c.kind == other,
            }
    })
}

pub fn foreign_keys_from(table: &str) -> impl Iterator<Item = &'static ConstraintDef> + '_ {
    CONSTRAINTS
        .iter()
        .filter(move |c| c.kind == ForeignKey && c.table == table)
}

/// Foreign keys that block deleting a row of `table` while children exist.
pub fn restricting_references_to(
    table: &str,
) -> impl Iterator<Item = &'static ConstraintDef> + '_ {
    CONSTRAINTS.iter().filter(move |c| {
        c.references
            .map(|r| r.table == table && r.on_delete == Restrict)
            .unwrap_or(false)
    })
}
