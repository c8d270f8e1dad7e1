use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum VaultError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    /// The schema could not be applied to a freshly created database file.
    #[error("Failed to initialize database schema: {0}")]
    SchemaInit(#[source] SqlxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Account store is closed")]
    StoreClosed,

    #[error("Ractor error: {0}")]
    RactorError(String),
}
