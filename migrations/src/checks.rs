//! Named CHECK constraints shared by the table migrations.
//!
//! Each check is declared once with the regular expression (or closed value
//! set) it stands for, and rendered into an expression the target engine can
//! evaluate natively. PostgreSQL gets the `~` operator. SQLite ships without a
//! `REGEXP` function, so the same languages are spelled out with `GLOB`,
//! `length` and `instr`.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

pub const LOGIN_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]{4,14}[A-Za-z0-9]$";
pub const PASSWORD_PATTERN: &str = r"^[ -~]{100,200}$";
pub const MOBILE_NUMBER_PATTERN: &str = r"^\+[0-9]{3}\([0-9]{2}\)[0-9]{3}-[0-9]{2}-[0-9]{2}$";
pub const EMAIL_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_]{5,15}@[A-Za-z]{2,10}\.[A-Za-z]{2,3}$";
pub const COMPANY_NAME_PATTERN: &str = r#"^[A-Za-z0-9 "]{6,16}$"#;
pub const SERVICE_NAME_PATTERN: &str = r#"^[A-Za-z0-9 "]{6,32}$"#;

pub const ROLENAMES: [&str; 3] = ["BROKER", "CONSULTANT", "USER"];
pub const BASKET_TYPES: [&str; 2] = ["SERVICE", "CONSULTATION"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    Login,
    Password,
    MobileNumber,
    Email,
    Rolename,
    CompanyName,
    ServiceName,
    BasketType,
}

impl Check {
    pub const ALL: [Check; 8] = [
        Check::Login,
        Check::Password,
        Check::MobileNumber,
        Check::Email,
        Check::Rolename,
        Check::CompanyName,
        Check::ServiceName,
        Check::BasketType,
    ];

    /// Constraint name as it appears in the database catalog.
    pub const fn name(self) -> &'static str {
        match self {
            Check::Login => "ch_login",
            Check::Password => "ch_password",
            Check::MobileNumber => "ch_mobnum",
            Check::Email => "ch_email",
            Check::Rolename => "ch_rolename",
            Check::CompanyName => "ch_cname",
            Check::ServiceName => "ch_sname",
            Check::BasketType => "ch_type",
        }
    }

    pub const fn table(self) -> &'static str {
        match self {
            Check::Login
            | Check::Password
            | Check::MobileNumber
            | Check::Email
            | Check::Rolename => "account",
            Check::CompanyName => "company",
            Check::ServiceName => "service",
            Check::BasketType => "basket",
        }
    }

    pub const fn column(self) -> &'static str {
        match self {
            Check::Login => "login",
            Check::Password => "password",
            Check::MobileNumber => "mob_num",
            Check::Email => "email",
            Check::Rolename => "rolename",
            Check::CompanyName => "company_name",
            Check::ServiceName => "service_name",
            Check::BasketType => "type",
        }
    }

    /// The regular expression a pattern check enforces, `None` for value sets.
    pub fn pattern(self) -> Option<&'static str> {
        match self {
            Check::Login => Some(LOGIN_PATTERN),
            Check::Password => Some(PASSWORD_PATTERN),
            Check::MobileNumber => Some(MOBILE_NUMBER_PATTERN),
            Check::Email => Some(EMAIL_PATTERN),
            Check::CompanyName => Some(COMPANY_NAME_PATTERN),
            Check::ServiceName => Some(SERVICE_NAME_PATTERN),
            Check::Rolename | Check::BasketType => None,
        }
    }

    /// The closed value set an enumeration check enforces, `None` for patterns.
    pub fn allowed_values(self) -> Option<&'static [&'static str]> {
        match self {
            Check::Rolename => Some(&ROLENAMES),
            Check::BasketType => Some(&BASKET_TYPES),
            _ => None,
        }
    }

    /// Boolean SQL expression over `column_sql` for the given backend.
    ///
    /// `column_sql` is spliced verbatim, so callers pass a quoted identifier
    /// (or any other expression yielding the value under test).
    pub fn expression_for(self, backend: DatabaseBackend, column_sql: &str) -> Result<String, DbErr> {
        if let Some(values) = self.allowed_values() {
            let list = values
                .iter()
                .map(|v| format!("'{v}'"))
                .collect::<Vec<_>>()
                .join(", ");
            return match backend {
                DatabaseBackend::Postgres | DatabaseBackend::Sqlite => {
                    Ok(format!("{column_sql} IN ({list})"))
                }
                other => Err(unsupported(other)),
            };
        }

        match backend {
            DatabaseBackend::Postgres => {
                // Patterns carry no single quotes, so they embed as literals.
                let pattern = self.pattern().unwrap_or_default();
                Ok(format!("{column_sql} ~ '{pattern}'"))
            }
            DatabaseBackend::Sqlite => self
                .sqlite_glob(column_sql)
                .ok_or_else(|| DbErr::Migration(format!("{} has no glob form", self.name()))),
            other => Err(unsupported(other)),
        }
    }

    /// Expression over this check's own quoted column.
    pub fn expression(self, backend: DatabaseBackend) -> Result<String, DbErr> {
        self.expression_for(backend, &format!("\"{}\"", self.column()))
    }

    /// Column-level constraint clause, appended to the column definition.
    pub fn clause(self, backend: DatabaseBackend) -> Result<String, DbErr> {
        Ok(format!(
            "CONSTRAINT \"{}\" CHECK ({})",
            self.name(),
            self.expression(backend)?
        ))
    }

    fn sqlite_glob(self, c: &str) -> Option<String> {
        let expr = match self {
            Check::Login => format!(
                "length({c}) BETWEEN 6 AND 16 \
                 AND {c} GLOB '[A-Za-z]*[A-Za-z0-9]' \
                 AND {c} NOT GLOB '*[^A-Za-z0-9_]*'"
            ),
            Check::Password => {
                format!("length({c}) BETWEEN 100 AND 200 AND {c} NOT GLOB '*[^ -~]*'")
            }
            Check::MobileNumber => format!(
                "{c} GLOB '+[0-9][0-9][0-9]([0-9][0-9])[0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]'"
            ),
            Check::Email => {
                let at = format!("instr({c}, '@')");
                let local = format!("substr({c}, 1, {at} - 1)");
                let host = format!("substr({c}, {at} + 1)");
                let dot = format!("instr({host}, '.')");
                format!(
                    "{c} GLOB '[A-Za-z]*@*' \
                     AND {at} BETWEEN 7 AND 17 \
                     AND {local} NOT GLOB '*[^A-Za-z0-9_]*' \
                     AND {host} NOT GLOB '*[^A-Za-z.]*' \
                     AND length({host}) - length(replace({host}, '.', '')) = 1 \
                     AND {dot} BETWEEN 3 AND 11 \
                     AND length({host}) - {dot} BETWEEN 2 AND 3"
                )
            }
            Check::CompanyName => {
                format!("length({c}) BETWEEN 6 AND 16 AND {c} NOT GLOB '*[^A-Za-z0-9 \"]*'")
            }
            Check::ServiceName => {
                format!("length({c}) BETWEEN 6 AND 32 AND {c} NOT GLOB '*[^A-Za-z0-9 \"]*'")
            }
            Check::Rolename | Check::BasketType => return None,
        };
        Some(expr)
    }
}

fn unsupported(backend: DatabaseBackend) -> DbErr {
    DbErr::Migration(format!(
        "check constraints are only rendered for PostgreSQL and SQLite, not {backend:?}"
    ))
}
