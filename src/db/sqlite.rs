use crate::db::models::Account;
use crate::db::schema::SQLITE_INIT;
use crate::error::VaultError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct AccountsStorage {
    pool: SqlitePool,
    path: PathBuf,
}

impl AccountsStorage {
    pub fn new(pool: SqlitePool, path: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            path: path.into(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the database at `path`, creating it and applying the schema if the
    /// file does not exist yet. An existing file is opened as-is.
    ///
    /// A schema failure removes the freshly created file and returns
    /// [`VaultError::SchemaInit`]; the store is never handed out without a schema.
    pub async fn initialize(path: impl AsRef<Path>) -> Result<Self, VaultError> {
        Self::initialize_with_schema(path, SQLITE_INIT).await
    }

    /// [`initialize`](Self::initialize) with caller-supplied DDL for a fresh file.
    #[doc(hidden)]
    pub async fn initialize_with_schema(
        path: impl AsRef<Path>,
        ddl: &str,
    ) -> Result<Self, VaultError> {
        let path = path.as_ref();
        let fresh = !tokio::fs::try_exists(path).await?;

        // One connection, one file: no pool fan-out and no WAL side files.
        let connect_opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(fresh)
            .journal_mode(SqliteJournalMode::Delete);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_opts)
            .await?;
        let storage = Self::new(pool, path);

        if fresh {
            debug!(path = %path.display(), "database file absent; applying schema");
            if let Err(e) = storage.init_schema(ddl).await {
                error!(path = %path.display(), error = %e, "schema initialization failed");
                storage.close().await;
                // A leftover file would be opened as initialized on the next run.
                if let Err(rm_err) = tokio::fs::remove_file(path).await {
                    warn!(
                        path = %path.display(),
                        error = %rm_err,
                        "failed to remove database file after schema failure"
                    );
                }
                return Err(e);
            }
            info!(path = %path.display(), "created account database");
        } else {
            debug!(path = %path.display(), "opened existing account database");
        }

        Ok(storage)
    }

    /// Apply `ddl` statement by statement.
    pub async fn init_schema(&self, ddl: &str) -> Result<(), VaultError> {
        // sqlx::query runs one statement at a time
        for stmt in ddl.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s)
                .execute(&self.pool)
                .await
                .map_err(VaultError::SchemaInit)?;
        }
        Ok(())
    }

    /// Exact, case-sensitive match on both fields.
    pub async fn exists(&self, service: &str, username: &str) -> Result<bool, VaultError> {
        let hit: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE service = ? AND username = ?)",
        )
        .bind(service)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        let found = hit != 0;
        debug!(service, username, found, "exists");
        Ok(found)
    }

    /// Insert a record unless `(service, username)` is already present.
    /// Returns whether a row was created.
    pub async fn add(
        &self,
        service: &str,
        username: &str,
        password: &str,
    ) -> Result<bool, VaultError> {
        if self.exists(service, username).await? {
            debug!(service, username, "add skipped: already exists");
            return Ok(false);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (service, username, password)
            VALUES (?, ?, ?)
            ON CONFLICT(service, username) DO NOTHING
            "#,
        )
        .bind(service)
        .bind(username)
        .bind(password)
        .execute(&self.pool)
        .await?;

        let created = result.rows_affected() == 1;
        debug!(service, username, created, "add");
        Ok(created)
    }

    pub async fn get(&self, service: &str, username: &str) -> Result<Option<Account>, VaultError> {
        let account = sqlx::query_as::<_, Account>(
            r#"SELECT id, service, username, password
               FROM accounts WHERE service = ? AND username = ?
               ORDER BY id LIMIT 1"#,
        )
        .bind(service)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        debug!(service, username, found = account.is_some(), "get");
        Ok(account)
    }

    /// Delete every matching record. Deleting nothing is not an error.
    pub async fn remove(&self, service: &str, username: &str) -> Result<(), VaultError> {
        let result = sqlx::query("DELETE FROM accounts WHERE service = ? AND username = ?")
            .bind(service)
            .bind(username)
            .execute(&self.pool)
            .await?;
        debug!(service, username, removed = result.rows_affected(), "remove");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!(path = %self.path.display(), "account database closed");
    }
}
