//! Donation orchestration — the end-to-end sequence from a user-entered
//! amount to a confirmed on-chain deposit with replicated off-chain records.
//!
//! The sequence contract:
//! 1. parse and validate the amount (rejected before anything is submitted),
//! 2. submit the deposit and wait for the confirmation receipt,
//! 3. replicate the donation record, unconditionally,
//! 4. if the receipt carries a transfer occurrence, replicate it too, using
//!    the payload's recipient and amount and the same tx hash,
//! 5. refresh the cached contract view and event history.
//!
//! Once the deposit is confirmed, the on-chain result stands: replication
//! failures become warnings on a successful outcome, and a duplicate
//! rejection means some earlier attempt already got the record in.

use tracing::{debug, info, warn};

use crate::chain::{ChainClient, ContractView, EventKind, Receipt};
use crate::errors::{DonationError, LogSinkError};
use crate::logs::{LogHistory, LogSink};
use crate::units;

/// Cached read-state for the presentation layer.
#[derive(Debug, Default)]
pub struct StateCache {
    pub contract: Option<ContractView>,
    pub history: LogHistory,
}

/// Which replication write went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicationStage {
    Donation,
    Transfer,
}

/// A failed off-chain write after a successful on-chain deposit.
#[derive(Debug, Clone)]
pub struct ReplicationWarning {
    pub stage: ReplicationStage,
    pub detail: String,
}

/// A settlement decoded from the confirmation receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    pub recipient: String,
    /// Swept amount in stroops, from the occurrence payload.
    pub amount: i128,
}

/// Result of one completed donation sequence.
#[derive(Debug)]
pub struct DonationOutcome {
    pub tx_hash: String,
    /// Deposited amount in stroops.
    pub amount: i128,
    /// The settlement, if this deposit tipped the threshold.
    pub transfer: Option<TransferSummary>,
    pub warnings: Vec<ReplicationWarning>,
}

pub struct Orchestrator<C, L> {
    chain: C,
    logs: L,
    donor: String,
    pub cache: StateCache,
}

impl<C: ChainClient, L: LogSink> Orchestrator<C, L> {
    pub fn new(chain: C, logs: L, donor: String) -> Self {
        Self {
            chain,
            logs,
            donor,
            cache: StateCache::default(),
        }
    }

    /// Drive one donation end-to-end. See the module docs for the sequence.
    pub async fn donate(&mut self, display_amount: &str) -> Result<DonationOutcome, DonationError> {
        let amount = units::parse_amount(display_amount)
            .map_err(|e| DonationError::InvalidAmount(format!("{display_amount:?}: {e}")))?;

        let tx_hash = self.chain.submit_deposit(&self.donor, amount).await?;
        info!("deposit submitted: {tx_hash}");
        let receipt = self.chain.await_receipt(&tx_hash).await?;
        info!("deposit confirmed: {}", receipt.tx_hash);

        let mut warnings = Vec::new();

        // The donation record is written no matter what the receipt holds.
        let donation_write = self
            .logs
            .record_donation(&self.donor, display_amount, &receipt.tx_hash)
            .await;
        if let Some(w) = replication_warning(ReplicationStage::Donation, donation_write) {
            warnings.push(w);
        }

        let transfer = find_transfer(&receipt);
        if let Some(t) = &transfer {
            let transfer_write = self
                .logs
                .record_transfer(
                    &t.recipient,
                    &units::format_amount(t.amount),
                    &receipt.tx_hash,
                )
                .await;
            if let Some(w) = replication_warning(ReplicationStage::Transfer, transfer_write) {
                warnings.push(w);
            }
        }

        self.refresh().await;

        Ok(DonationOutcome {
            tx_hash: receipt.tx_hash,
            amount,
            transfer,
            warnings,
        })
    }

    /// Refresh the cached contract view and event history. Read failures
    /// keep the stale cache and only log; the caller's flow is unaffected.
    pub async fn refresh(&mut self) {
        match self.chain.contract_view().await {
            Ok(view) => self.cache.contract = Some(view),
            Err(e) => warn!("contract view refresh failed: {e}"),
        }
        match self.logs.fetch_all().await {
            Ok(history) => self.cache.history = history,
            Err(e) => warn!("history refresh failed: {e}"),
        }
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }
}

/// Map one replication result: `Ok` and `Duplicate` both count as recorded;
/// everything else becomes a warning on the outcome.
fn replication_warning(
    stage: ReplicationStage,
    result: Result<(), LogSinkError>,
) -> Option<ReplicationWarning> {
    match result {
        Ok(()) => None,
        Err(LogSinkError::Duplicate(detail)) => {
            debug!("record already stored ({stage:?}): {detail}");
            None
        }
        Err(e) => {
            warn!("replication failed ({stage:?}): {e}");
            Some(ReplicationWarning {
                stage,
                detail: e.to_string(),
            })
        }
    }
}

/// First transfer occurrence in the receipt, decoded from its payload.
fn find_transfer(receipt: &Receipt) -> Option<TransferSummary> {
    let event = receipt
        .events
        .iter()
        .find(|e| e.kind == EventKind::FundsTransferred)?;

    match (&event.address, event.amount) {
        (Some(recipient), Some(amount)) => Some(TransferSummary {
            recipient: recipient.clone(),
            amount,
        }),
        _ => {
            warn!("transfer occurrence missing fields; skipping replication");
            None
        }
    }
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::chain::{LedgerEvent, NetworkInfo};
    use crate::errors::ChainError;
    use crate::logs::{DonationLog, TransferLog};

    const DONOR: &str = "GDONOR";
    const OWNER: &str = "GOWNER";
    const HASH: &str = "0xABC";

    // Mock chain client: scripted submit/receipt results, records every
    // submission it sees.
    struct MockChainClient {
        submit_result: Mutex<Option<Result<String, ChainError>>>,
        receipt_result: Mutex<Option<Result<Receipt, ChainError>>>,
        submitted: Mutex<Vec<(String, i128)>>,
    }

    impl MockChainClient {
        fn confirming(receipt: Receipt) -> Self {
            Self {
                submit_result: Mutex::new(Some(Ok(receipt.tx_hash.clone()))),
                receipt_result: Mutex::new(Some(Ok(receipt))),
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn rejecting(err: ChainError) -> Self {
            Self {
                submit_result: Mutex::new(Some(Err(err))),
                receipt_result: Mutex::new(None),
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn failing_confirmation(err: ChainError) -> Self {
            Self {
                submit_result: Mutex::new(Some(Ok(HASH.to_string()))),
                receipt_result: Mutex::new(Some(Err(err))),
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn submissions(&self) -> Vec<(String, i128)> {
            self.submitted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChainClient for MockChainClient {
        async fn submit_deposit(&self, donor: &str, amount: i128) -> Result<String, ChainError> {
            self.submitted
                .lock()
                .unwrap()
                .push((donor.to_string(), amount));
            self.submit_result
                .lock()
                .unwrap()
                .take()
                .expect("unexpected submit_deposit call")
        }

        async fn await_receipt(&self, _tx_hash: &str) -> Result<Receipt, ChainError> {
            self.receipt_result
                .lock()
                .unwrap()
                .take()
                .expect("unexpected await_receipt call")
        }

        async fn contract_view(&self) -> Result<ContractView, ChainError> {
            Ok(ContractView {
                balance: 0,
                threshold: 500_000,
                total_amount: 0,
                owner: OWNER.to_string(),
            })
        }

        async fn network(&self) -> Result<NetworkInfo, ChainError> {
            Ok(NetworkInfo {
                passphrase: "Test SDF Network ; September 2015".to_string(),
                latest_ledger: 1,
            })
        }
    }

    // In-memory log sink with the store's per-kind tx_hash uniqueness and an
    // optional scripted failure for the next donation write.
    #[derive(Default)]
    struct MemoryLogSink {
        donations: Mutex<Vec<(String, String, String)>>,
        transfers: Mutex<Vec<(String, String, String)>>,
        fail_next_donation: Mutex<Option<LogSinkError>>,
        calls: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl LogSink for MemoryLogSink {
        async fn record_donation(
            &self,
            donor: &str,
            amount: &str,
            tx_hash: &str,
        ) -> Result<(), LogSinkError> {
            self.calls.lock().unwrap().push("donation");
            if let Some(err) = self.fail_next_donation.lock().unwrap().take() {
                return Err(err);
            }
            let mut rows = self.donations.lock().unwrap();
            if rows.iter().any(|(_, _, h)| h == tx_hash) {
                return Err(LogSinkError::Duplicate(format!("duplicate txHash: {tx_hash}")));
            }
            rows.push((donor.to_string(), amount.to_string(), tx_hash.to_string()));
            Ok(())
        }

        async fn record_transfer(
            &self,
            recipient: &str,
            total_transferred: &str,
            tx_hash: &str,
        ) -> Result<(), LogSinkError> {
            self.calls.lock().unwrap().push("transfer");
            let mut rows = self.transfers.lock().unwrap();
            if rows.iter().any(|(_, _, h)| h == tx_hash) {
                return Err(LogSinkError::Duplicate(format!("duplicate txHash: {tx_hash}")));
            }
            rows.push((
                recipient.to_string(),
                total_transferred.to_string(),
                tx_hash.to_string(),
            ));
            Ok(())
        }

        async fn fetch_all(&self) -> Result<LogHistory, LogSinkError> {
            let donations = self
                .donations
                .lock()
                .unwrap()
                .iter()
                .enumerate()
                .map(|(i, (donor, amount, tx_hash))| DonationLog {
                    id: i as i64,
                    donor: donor.clone(),
                    amount: amount.clone(),
                    tx_hash: tx_hash.clone(),
                    timestamp: 0,
                })
                .collect();
            let transfers = self
                .transfers
                .lock()
                .unwrap()
                .iter()
                .enumerate()
                .map(|(i, (recipient, total, tx_hash))| TransferLog {
                    id: i as i64,
                    recipient: recipient.clone(),
                    total_transferred: total.clone(),
                    tx_hash: tx_hash.clone(),
                    timestamp: 0,
                })
                .collect();
            Ok(LogHistory {
                donations,
                transfers,
            })
        }
    }

    fn deposit_event(amount: i128) -> LedgerEvent {
        LedgerEvent {
            kind: EventKind::FundDeposited,
            address: Some(DONOR.to_string()),
            amount: Some(amount),
        }
    }

    fn transfer_event(amount: i128) -> LedgerEvent {
        LedgerEvent {
            kind: EventKind::FundsTransferred,
            address: Some(OWNER.to_string()),
            amount: Some(amount),
        }
    }

    fn receipt(events: Vec<LedgerEvent>) -> Receipt {
        Receipt {
            tx_hash: HASH.to_string(),
            events,
        }
    }

    #[tokio::test]
    async fn donation_without_settlement_replicates_donation_only() {
        let chain = MockChainClient::confirming(receipt(vec![deposit_event(200_000)]));
        let mut orch = Orchestrator::new(chain, MemoryLogSink::default(), DONOR.to_string());

        let outcome = orch.donate("0.02").await.unwrap();

        assert_eq!(outcome.tx_hash, HASH);
        assert_eq!(outcome.amount, 200_000);
        assert!(outcome.transfer.is_none());
        assert!(outcome.warnings.is_empty());

        assert_eq!(orch.cache.history.donations.len(), 1);
        assert_eq!(orch.cache.history.donations[0].amount, "0.02");
        assert!(orch.cache.history.transfers.is_empty());
    }

    #[tokio::test]
    async fn settlement_replicates_both_records_with_shared_hash() {
        let chain = MockChainClient::confirming(receipt(vec![
            deposit_event(500_000),
            transfer_event(500_000),
        ]));
        let mut orch = Orchestrator::new(chain, MemoryLogSink::default(), DONOR.to_string());

        let outcome = orch.donate("0.05").await.unwrap();

        assert_eq!(
            outcome.transfer,
            Some(TransferSummary {
                recipient: OWNER.to_string(),
                amount: 500_000,
            })
        );
        assert!(outcome.warnings.is_empty());

        let history = &orch.cache.history;
        assert_eq!(history.donations.len(), 1);
        assert_eq!(history.transfers.len(), 1);
        assert_eq!(history.donations[0].tx_hash, history.transfers[0].tx_hash);
        // The transfer amount comes from the occurrence payload, rendered
        // back to display units.
        assert_eq!(history.transfers[0].total_transferred, "0.05");
    }

    #[tokio::test]
    async fn invalid_amounts_never_reach_the_chain() {
        for bad in ["0", "-1", "abc", ""] {
            let chain = MockChainClient::confirming(receipt(vec![]));
            let sink = MemoryLogSink::default();
            let mut orch = Orchestrator::new(chain, sink, DONOR.to_string());

            let err = orch.donate(bad).await.unwrap_err();
            assert!(matches!(err, DonationError::InvalidAmount(_)), "input {bad:?}");
            assert!(orch.chain().submissions().is_empty(), "input {bad:?}");
        }
    }

    #[tokio::test]
    async fn chain_rejection_leaves_no_off_chain_record() {
        let chain = MockChainClient::rejecting(ChainError::Rpc {
            code: -32000,
            message: "user declined".to_string(),
        });
        let mut orch = Orchestrator::new(chain, MemoryLogSink::default(), DONOR.to_string());

        let err = orch.donate("0.02").await.unwrap_err();
        assert!(matches!(err, DonationError::Chain(_)));
        assert!(orch.cache.history.donations.is_empty());
    }

    #[tokio::test]
    async fn unconfirmed_deposit_leaves_no_off_chain_record() {
        let chain = MockChainClient::failing_confirmation(ChainError::ConfirmationTimeout {
            hash: HASH.to_string(),
            timeout_secs: 60,
        });
        let mut orch = Orchestrator::new(chain, MemoryLogSink::default(), DONOR.to_string());

        assert!(orch.donate("0.02").await.is_err());
        assert!(orch.cache.history.donations.is_empty());
        assert!(orch.cache.history.transfers.is_empty());
    }

    #[tokio::test]
    async fn replication_failure_is_a_warning_not_a_failure() {
        let chain = MockChainClient::confirming(receipt(vec![
            deposit_event(500_000),
            transfer_event(500_000),
        ]));
        let sink = MemoryLogSink {
            fail_next_donation: Mutex::new(Some(LogSinkError::Rejected(
                "store unavailable".to_string(),
            ))),
            ..MemoryLogSink::default()
        };
        let mut orch = Orchestrator::new(chain, sink, DONOR.to_string());

        let outcome = orch.donate("0.05").await.unwrap();

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].stage, ReplicationStage::Donation);
        // The transfer replication still ran, independently of the failed
        // donation write.
        assert_eq!(orch.cache.history.transfers.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_rejection_is_absorbed_silently() {
        let chain = MockChainClient::confirming(receipt(vec![deposit_event(200_000)]));
        let sink = MemoryLogSink::default();
        sink.record_donation(DONOR, "0.02", HASH).await.unwrap();

        let mut orch = Orchestrator::new(chain, sink, DONOR.to_string());
        let outcome = orch.donate("0.02").await.unwrap();

        assert!(outcome.warnings.is_empty());
        assert_eq!(orch.cache.history.donations.len(), 1);
    }

    #[tokio::test]
    async fn donation_is_replicated_before_transfer() {
        let chain = MockChainClient::confirming(receipt(vec![
            deposit_event(500_000),
            transfer_event(500_000),
        ]));
        let sink = std::sync::Arc::new(MemoryLogSink::default());
        let mut orch = Orchestrator::new(chain, sink.clone(), DONOR.to_string());

        orch.donate("0.05").await.unwrap();

        assert_eq!(*sink.calls.lock().unwrap(), ["donation", "transfer"]);
    }

    #[tokio::test]
    async fn refresh_populates_contract_view() {
        let chain = MockChainClient::confirming(receipt(vec![]));
        let mut orch = Orchestrator::new(chain, MemoryLogSink::default(), DONOR.to_string());

        orch.refresh().await;

        let view = orch.cache.contract.as_ref().expect("view cached");
        assert_eq!(view.threshold, 500_000);
        assert_eq!(view.owner, OWNER);
    }
}
