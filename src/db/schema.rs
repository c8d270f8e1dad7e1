//! SQL DDL for initializing the account storage.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `service`, `username`, `password` as plain text (64 chars is the intended
///   ceiling, not enforced here)
/// - UNIQUE index on `(service, username)`, the business key of a record
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    service TEXT NOT NULL,
    username TEXT NOT NULL,
    password TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_service_username ON accounts(service, username);
"#;
