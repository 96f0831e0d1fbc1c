//! Marketplace schema library
//!
//! Relational schema for a small marketplace (accounts, bans, companies,
//! services, baskets and price history) with every integrity rule declared
//! as a named engine constraint, plus typed access over SeaORM.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod constraints;
pub mod db;
pub mod entities;
pub mod errors;
pub mod repositories;

pub use errors::{ReferentialReason, SchemaError, SchemaResult, WriteContext, WriteOp};
pub use migrations::Migrator;
