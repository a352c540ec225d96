//! Chain client surface — typed calls over the wallet-provided connection.
//!
//! The orchestrator only sees this trait; the JSON-RPC implementation lives
//! in [`crate::rpc`] and the tests drive a mock.

use async_trait::async_trait;

use crate::errors::ChainError;

/// Occurrence kinds emitted by the charity fund contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A donation was accepted (`deposited` topic).
    FundDeposited,
    /// A settlement swept the held balance to the owner (`transferred` topic).
    FundsTransferred,
    /// An event from this contract that we don't recognise.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "deposited" => Self::FundDeposited,
            "transferred" => Self::FundsTransferred,
            _ => Self::Unknown,
        }
    }

}

/// One decoded occurrence from a confirmed transaction.
#[derive(Debug, Clone)]
pub struct LedgerEvent {
    pub kind: EventKind,
    /// Donor for deposits, recipient for transfers.
    pub address: Option<String>,
    /// Amount in stroops, decoded from the occurrence payload.
    pub amount: Option<i128>,
}

/// Confirmation data for a finalized transaction: its hash and the ordered
/// occurrence list emitted during execution.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub tx_hash: String,
    pub events: Vec<LedgerEvent>,
}

/// Read-state snapshot of the contract, in stroops.
#[derive(Debug, Clone)]
pub struct ContractView {
    pub balance: i128,
    pub threshold: i128,
    pub total_amount: i128,
    pub owner: String,
}

/// Network the wallet connection points at.
#[derive(Debug, Clone)]
pub struct NetworkInfo {
    pub passphrase: String,
    pub latest_ledger: u64,
}

/// Typed surface over the wallet-provided chain connection.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Submit a signed deposit; returns the pending transaction hash.
    /// A refusal or revert surfaces verbatim and is never retried.
    async fn submit_deposit(&self, donor: &str, amount: i128) -> Result<String, ChainError>;

    /// Wait until the chain finalizes `tx_hash` and return its receipt.
    async fn await_receipt(&self, tx_hash: &str) -> Result<Receipt, ChainError>;

    /// Current contract read-state.
    async fn contract_view(&self) -> Result<ContractView, ChainError>;

    /// Connection/network status.
    async fn network(&self) -> Result<NetworkInfo, ChainError>;
}

/// Produces signed transaction envelopes for deposit invocations.
///
/// This is the wallet seam. The RPC adapter never holds keys; it hands the
/// invocation to whatever wallet integration the user connected.
pub trait DepositSigner: Send + Sync {
    fn sign_deposit(&self, contract_id: &str, donor: &str, amount: i128)
        -> Result<String, ChainError>;
}
