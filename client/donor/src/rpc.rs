//! Soroban RPC implementation of the chain client.
//!
//! Speaks JSON-RPC 2.0 against the chain endpoint: `sendTransaction` for
//! submission (the envelope comes from the wallet seam), `getTransaction`
//! polled until the transaction finalizes, `simulateTransaction` for the
//! read accessors. Topics and event values arrive XDR-decoded to JSON
//! (`{"type":…, "value":…}` shapes).
//!
//! Failed submissions are never retried; confirmation polling is the only
//! wait loop, and it is bounded by the configured timeout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::chain::{
    ChainClient, ContractView, DepositSigner, EventKind, LedgerEvent, NetworkInfo, Receipt,
};
use crate::errors::ChainError;

pub struct SorobanRpcClient {
    http: Client,
    rpc_url: String,
    contract_id: String,
    signer: Arc<dyn DepositSigner>,
    confirm_interval: Duration,
    confirm_timeout: Duration,
}

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct SendTransactionResult {
    hash: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct GetTransactionResult {
    status: String,
    #[serde(default)]
    events: Vec<RawEvent>,
}

/// One event as returned by the RPC, topics and value XDR-decoded to JSON.
#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Decoded topic list; the leading symbol names the event.
    pub topic: Vec<String>,
    /// Decoded event payload.
    pub value: Value,
}

#[derive(Debug, Deserialize)]
struct SimulateResult {
    result: Value,
}

#[derive(Debug, Deserialize)]
struct GetNetworkResult {
    passphrase: String,
}

#[derive(Debug, Deserialize)]
struct LatestLedgerResult {
    sequence: u64,
}

// ─────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────

impl SorobanRpcClient {
    pub fn new(
        http: Client,
        rpc_url: String,
        contract_id: String,
        signer: Arc<dyn DepositSigner>,
        confirm_interval: Duration,
        confirm_timeout: Duration,
    ) -> Self {
        Self {
            http,
            rpc_url,
            contract_id,
            signer,
            confirm_interval,
            confirm_timeout,
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ChainError> {
        let resp = self
            .http
            .post(&self.rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await?;

        let body: RpcResponse<T> = resp.json().await?;

        if let Some(err) = body.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        body.result
            .ok_or_else(|| ChainError::Decode(format!("empty result from {method}")))
    }

    /// Invoke a read accessor through `simulateTransaction` and return its
    /// decoded return value.
    async fn read_value(&self, function: &str) -> Result<Value, ChainError> {
        let simulated: SimulateResult = self
            .call(
                "simulateTransaction",
                json!({
                    "contractId": self.contract_id,
                    "function": function,
                    "args": [],
                }),
            )
            .await?;
        Ok(simulated.result)
    }
}

#[async_trait]
impl ChainClient for SorobanRpcClient {
    async fn submit_deposit(&self, donor: &str, amount: i128) -> Result<String, ChainError> {
        let envelope = self.signer.sign_deposit(&self.contract_id, donor, amount)?;

        let sent: SendTransactionResult = self
            .call("sendTransaction", json!({ "transaction": envelope }))
            .await?;

        if sent.status == "ERROR" {
            return Err(ChainError::TransactionFailed(sent.hash));
        }

        debug!("deposit submitted, hash {}", sent.hash);
        Ok(sent.hash)
    }

    async fn await_receipt(&self, tx_hash: &str) -> Result<Receipt, ChainError> {
        let started = Instant::now();

        loop {
            let tx: GetTransactionResult =
                self.call("getTransaction", json!({ "hash": tx_hash })).await?;

            match tx.status.as_str() {
                "SUCCESS" => {
                    return Ok(Receipt {
                        tx_hash: tx_hash.to_string(),
                        events: decode_events(&tx.events),
                    });
                }
                "FAILED" => return Err(ChainError::TransactionFailed(tx_hash.to_string())),
                // NOT_FOUND: still in flight, keep polling.
                _ => {}
            }

            if started.elapsed() >= self.confirm_timeout {
                return Err(ChainError::ConfirmationTimeout {
                    hash: tx_hash.to_string(),
                    timeout_secs: self.confirm_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.confirm_interval).await;
        }
    }

    async fn contract_view(&self) -> Result<ContractView, ChainError> {
        let balance = parse_i128(&self.read_value("get_contract_balance").await?)?;
        let threshold = parse_i128(&self.read_value("threshold").await?)?;
        let total_amount = parse_i128(&self.read_value("total_amount").await?)?;
        let owner = parse_address(&self.read_value("owner").await?)?;

        Ok(ContractView {
            balance,
            threshold,
            total_amount,
            owner,
        })
    }

    async fn network(&self) -> Result<NetworkInfo, ChainError> {
        let network: GetNetworkResult = self.call("getNetwork", json!({})).await?;
        let ledger: LatestLedgerResult = self.call("getLatestLedger", json!({})).await?;

        Ok(NetworkInfo {
            passphrase: network.passphrase,
            latest_ledger: ledger.sequence,
        })
    }
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a receipt's raw occurrence list into typed [`LedgerEvent`]s,
/// preserving order.
pub fn decode_events(raw: &[RawEvent]) -> Vec<LedgerEvent> {
    raw.iter().map(decode_single).collect()
}

fn decode_single(raw: &RawEvent) -> LedgerEvent {
    let kind = raw
        .topic
        .first()
        .map(|t| EventKind::from_topic(&extract_symbol(t)))
        .unwrap_or(EventKind::Unknown);

    let (address, amount) = match kind {
        EventKind::FundDeposited => (
            extract_field(&raw.value, &["donor"]),
            extract_i128_field(&raw.value, &["amount"]),
        ),
        EventKind::FundsTransferred => (
            extract_field(&raw.value, &["recipient"]),
            extract_i128_field(&raw.value, &["amount"]),
        ),
        EventKind::Unknown => (None, None),
    };

    LedgerEvent {
        kind,
        address,
        amount,
    }
}

/// Extract a Soroban Symbol from the XDR-decoded topic string.
/// The RPC may return `{"type":"symbol","value":"deposited"}` or just the
/// raw string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    // Fallback: treat the raw string as the symbol
    raw.to_string()
}

/// Pull a field out of the decoded payload object. Handles bare strings,
/// bare numbers, and `{"type":…, "value":…}` wrappers.
fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(key) {
            let s = match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Object(_) => v.get("value").and_then(|inner| {
                    inner
                        .as_str()
                        .map(String::from)
                        .or_else(|| inner.as_i64().map(|n| n.to_string()))
                }),
                _ => None,
            };
            if s.is_some() {
                return s;
            }
        }
    }
    None
}

fn extract_i128_field(value: &Value, keys: &[&str]) -> Option<i128> {
    extract_field(value, keys).and_then(|s| s.parse::<i128>().ok())
}

/// Parse an i128 read result: `{"type":"i128","value":"500000"}`, a bare
/// string, or a bare number.
fn parse_i128(value: &Value) -> Result<i128, ChainError> {
    let inner = value.get("value").unwrap_or(value);
    if let Some(s) = inner.as_str() {
        return s
            .parse()
            .map_err(|_| ChainError::Decode(format!("bad i128 string: {s}")));
    }
    if let Some(n) = inner.as_i64() {
        return Ok(n as i128);
    }
    Err(ChainError::Decode(format!("expected i128, got {value}")))
}

fn parse_address(value: &Value) -> Result<String, ChainError> {
    let inner = value.get("value").unwrap_or(value);
    inner
        .as_str()
        .map(String::from)
        .ok_or_else(|| ChainError::Decode(format!("expected address, got {value}")))
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
