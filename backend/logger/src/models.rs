//! Record schemas for the two event kinds the service persists.
//!
//! Each kind has a fixed shape: a write body validated at the extraction
//! boundary (unknown fields rejected) and a stored row with the
//! server-assigned id and timestamp. Wire field names are camelCase to match
//! the REST surface; amounts are decimal strings of display units.

use serde::{Deserialize, Serialize};

/// Body of `POST /logs/donation`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewDonation {
    pub donor: String,
    pub amount: String,
    #[serde(rename = "txHash")]
    pub tx_hash: String,
}

/// Body of `POST /logs/charity-transfer`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTransfer {
    pub recipient: String,
    #[serde(rename = "totalTransferred")]
    pub total_transferred: String,
    #[serde(rename = "txHash")]
    pub tx_hash: String,
}

/// A stored donation record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DonationLog {
    pub id: i64,
    pub donor: String,
    pub amount: String,
    #[serde(rename = "txHash")]
    pub tx_hash: String,
    /// Unix seconds, assigned by the server at write time.
    pub timestamp: i64,
}

/// A stored transfer record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CharityTransfer {
    pub id: i64,
    pub recipient: String,
    #[serde(rename = "totalTransferred")]
    pub total_transferred: String,
    #[serde(rename = "txHash")]
    pub tx_hash: String,
    /// Unix seconds, assigned by the server at write time.
    pub timestamp: i64,
}
