//! Database module: the account model, schema and the store that owns the file.
//!
//! Layout:
//! - `models.rs`: Rust struct mirroring an `accounts` row
//! - `schema.rs`: SQL DDL applied when the database file is first created
//! - `sqlite.rs`: queries against the single `accounts` table
//! - `actor.rs`: single-owner actor and the handle the rest of the crate uses

pub mod actor;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use actor::{AccountStoreHandle, spawn};
pub use models::Account;
pub use schema::SQLITE_INIT;
pub use sqlite::{AccountsStorage, SqlitePool};
