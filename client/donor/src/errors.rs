//! Client-side error taxonomy for the donation flow.
//!
//! Nothing here is retried automatically. Chain failures surface verbatim;
//! once a deposit is final, replication problems downgrade to warnings, and
//! a duplicate rejection from the log API is success-equivalent.

use thiserror::Error;

/// Wallet- or chain-side failure.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transaction {0} failed on-chain")]
    TransactionFailed(String),

    #[error("transaction {hash} not confirmed within {timeout_secs}s")]
    ConfirmationTimeout { hash: String, timeout_secs: u64 },

    #[error("malformed RPC payload: {0}")]
    Decode(String),

    #[error("wallet signing failed: {0}")]
    Signing(String),
}

/// Log ingestion API failure.
#[derive(Debug, Error)]
pub enum LogSinkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store already holds a record for this tx_hash.
    #[error("already recorded: {0}")]
    Duplicate(String),

    #[error("log API rejected the record: {0}")]
    Rejected(String),
}

/// Top-level failure of one donation sequence. Replication problems are not
/// represented here — they ride on the successful outcome as warnings.
#[derive(Debug, Error)]
pub enum DonationError {
    /// Rejected before anything is submitted to the chain.
    #[error("invalid donation amount: {0}")]
    InvalidAmount(String),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

#[derive(Debug, Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);
