//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A record with this tx_hash already exists. The stored row is left
    /// untouched; clients treat this rejection as already-recorded.
    #[error("duplicate txHash: {0}")]
    Duplicate(String),
}

pub type Result<T> = std::result::Result<T, LoggerError>;
