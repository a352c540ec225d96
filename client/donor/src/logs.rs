//! Log ingestion API client and the `LogSink` seam.
//!
//! The orchestrator writes through [`LogSink`]; [`LogApiClient`] is the HTTP
//! implementation against the log service. A duplicate rejection means the
//! record already made it in; callers treat it as success-equivalent.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::LogSinkError;

/// A stored donation record as served by `GET /logs/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationLog {
    pub id: i64,
    pub donor: String,
    pub amount: String,
    #[serde(rename = "txHash")]
    pub tx_hash: String,
    pub timestamp: i64,
}

/// A stored transfer record as served by `GET /logs/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferLog {
    pub id: i64,
    pub recipient: String,
    #[serde(rename = "totalTransferred")]
    pub total_transferred: String,
    #[serde(rename = "txHash")]
    pub tx_hash: String,
    pub timestamp: i64,
}

/// Combined event history, each kind newest first.
#[derive(Debug, Clone, Default)]
pub struct LogHistory {
    pub donations: Vec<DonationLog>,
    pub transfers: Vec<TransferLog>,
}

/// Write/read surface of the log store.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn record_donation(
        &self,
        donor: &str,
        amount: &str,
        tx_hash: &str,
    ) -> Result<(), LogSinkError>;

    async fn record_transfer(
        &self,
        recipient: &str,
        total_transferred: &str,
        tx_hash: &str,
    ) -> Result<(), LogSinkError>;

    async fn fetch_all(&self) -> Result<LogHistory, LogSinkError>;
}

#[async_trait]
impl<T: LogSink + ?Sized> LogSink for std::sync::Arc<T> {
    async fn record_donation(
        &self,
        donor: &str,
        amount: &str,
        tx_hash: &str,
    ) -> Result<(), LogSinkError> {
        (**self).record_donation(donor, amount, tx_hash).await
    }

    async fn record_transfer(
        &self,
        recipient: &str,
        total_transferred: &str,
        tx_hash: &str,
    ) -> Result<(), LogSinkError> {
        (**self)
            .record_transfer(recipient, total_transferred, tx_hash)
            .await
    }

    async fn fetch_all(&self) -> Result<LogHistory, LogSinkError> {
        (**self).fetch_all().await
    }
}

// ─────────────────────────────────────────────────────────
// HTTP implementation
// ─────────────────────────────────────────────────────────

pub struct LogApiClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AllLogsResponse {
    success: bool,
    #[serde(default)]
    donations: Vec<DonationLog>,
    #[serde(default)]
    transfers: Vec<TransferLog>,
    #[serde(default)]
    error: Option<String>,
}

impl LogApiClient {
    pub fn new(http: Client, base_url: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_record(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<(), LogSinkError> {
        let resp = self
            .http
            .post(format!("{}/{path}", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let parsed: WriteResponse = resp.json().await?;

        if parsed.success {
            return Ok(());
        }

        let error = parsed
            .error
            .unwrap_or_else(|| format!("HTTP {status} with no error detail"));

        // The service reports an already-stored tx_hash inside its uniform
        // 400 envelope; the stable message prefix is the discriminator.
        if status == StatusCode::BAD_REQUEST && error.starts_with("duplicate txHash") {
            return Err(LogSinkError::Duplicate(error));
        }
        Err(LogSinkError::Rejected(error))
    }
}

#[async_trait]
impl LogSink for LogApiClient {
    async fn record_donation(
        &self,
        donor: &str,
        amount: &str,
        tx_hash: &str,
    ) -> Result<(), LogSinkError> {
        self.post_record(
            "logs/donation",
            json!({ "donor": donor, "amount": amount, "txHash": tx_hash }),
        )
        .await
    }

    async fn record_transfer(
        &self,
        recipient: &str,
        total_transferred: &str,
        tx_hash: &str,
    ) -> Result<(), LogSinkError> {
        self.post_record(
            "logs/charity-transfer",
            json!({
                "recipient": recipient,
                "totalTransferred": total_transferred,
                "txHash": tx_hash,
            }),
        )
        .await
    }

    async fn fetch_all(&self) -> Result<LogHistory, LogSinkError> {
        let resp = self
            .http
            .get(format!("{}/logs/all", self.base_url))
            .send()
            .await?;

        let parsed: AllLogsResponse = resp.json().await?;
        if !parsed.success {
            return Err(LogSinkError::Rejected(
                parsed.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(LogHistory {
            donations: parsed.donations,
            transfers: parsed.transfers,
        })
    }
}
