use crate::{
    account::TokenAccountRecord,
    burn::build_burn_transaction,
    client::LedgerReader,
    error::SweepError,
    estimator::{estimate_reclaim, ReclaimEstimate},
    events::{EngineEvent, EventSink},
    history::{ActionKind, ActionStatus, HistoryEntry, HistoryStore, NewHistoryEntry},
    plan::{build_close_plan, BatchPlan},
    scanner::AccountScanner,
    sequencer::{submit_sequential, SubmitOutcome},
    signer::WalletSigner,
};
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

/// Result of a bulk or single close action.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CloseSummary {
    pub closed_accounts: usize,
    pub confirmed_batches: usize,
    pub signature: Option<String>,
}

/// Result of a burn action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnSummary {
    pub base_units: u64,
    pub signature: Option<String>,
}

/// The one canonical engine. Owns the record set and the history store;
/// the ledger client and the wallet are injected, never ambient.
pub struct SweepEngine {
    reader: Arc<dyn LedgerReader>,
    signer: Arc<dyn WalletSigner>,
    scanner: AccountScanner,
    history: HistoryStore,
    explorer_url: String,
    events: EventSink,
}

impl SweepEngine {
    pub fn new(
        reader: Arc<dyn LedgerReader>,
        signer: Arc<dyn WalletSigner>,
        history: HistoryStore,
        explorer_url: impl Into<String>,
        events: EventSink,
    ) -> Self {
        let explorer_url: String = explorer_url.into();
        Self {
            reader,
            signer,
            scanner: AccountScanner::new(),
            history,
            explorer_url: explorer_url.trim_end_matches('/').to_string(),
            events,
        }
    }

    pub fn wallet(&self) -> Pubkey {
        self.signer.pubkey()
    }

    pub fn records(&self) -> &[TokenAccountRecord] {
        self.scanner.records()
    }

    /// Replaces the record set with the wallet's current token accounts.
    pub async fn scan(&mut self) -> Result<usize, SweepError> {
        let owner = self.wallet();
        self.scanner.scan(self.reader.as_ref(), owner, &self.events).await
    }

    /// Rent recoverable by closing the currently scanned empty accounts.
    pub async fn estimate_reclaim(&self) -> Result<ReclaimEstimate, SweepError> {
        estimate_reclaim(self.reader.as_ref(), self.scanner.records(), &self.events).await
    }

    /// Handler for an identity change: the record set belongs to the old
    /// wallet, so it is dropped and one scan runs against the new one.
    pub async fn wallet_changed(
        &mut self,
        signer: Arc<dyn WalletSigner>,
    ) -> Result<usize, SweepError> {
        self.signer = signer;
        self.scanner.clear();
        self.scan().await
    }

    /// Closes every empty account in the current record set, reclaiming its
    /// rent to the wallet. Partial completion stands: confirmed batches are
    /// final and the caller must re-scan to see the remaining state.
    pub async fn close_empty_accounts(&mut self) -> Result<CloseSummary, SweepError> {
        let targets: Vec<TokenAccountRecord> =
            self.scanner.records().iter().filter(|r| r.is_empty()).cloned().collect();
        if targets.is_empty() {
            self.events.emit(EngineEvent::Status("No empty accounts to close".to_string()));
            return Ok(CloseSummary::default());
        }

        let owner = self.wallet();
        let plan = build_close_plan(&targets, &owner)?;
        self.run_close_plan(plan).await
    }

    /// Closes one account by address. The account must be in the current
    /// record set and must be empty.
    pub async fn close_account(&mut self, address: Pubkey) -> Result<CloseSummary, SweepError> {
        let record = self
            .scanner
            .records()
            .iter()
            .find(|r| r.address == address)
            .cloned()
            .ok_or_else(|| SweepError::AccountNotFound(address.to_string()))?;

        if !record.is_empty() {
            return Err(SweepError::ValidationError(format!(
                "account {address} still holds {} tokens; burn or transfer them first",
                record.display_amount()
            )));
        }

        let owner = self.wallet();
        let plan = build_close_plan(std::slice::from_ref(&record), &owner)?;
        self.run_close_plan(plan).await
    }

    async fn run_close_plan(&mut self, plan: BatchPlan) -> Result<CloseSummary, SweepError> {
        let batch_sizes: Vec<usize> = plan.batches.iter().map(|b| b.records.len()).collect();
        let transactions = plan.batches.into_iter().map(|b| b.transaction).collect();

        let outcome = submit_sequential(
            transactions,
            self.signer.as_ref(),
            self.reader.as_ref(),
            &self.events,
        )
        .await;

        let closed_accounts: usize = batch_sizes.iter().take(outcome.confirmed).sum();
        let signature = outcome.last_signature.map(|s| s.to_string());

        self.finish_action(
            ActionKind::Close,
            &outcome,
            NewHistoryEntry {
                kind: ActionKind::Close,
                status: status_of(&outcome),
                mint: None,
                amount: None,
                count: Some(closed_accounts),
                signature: signature.clone(),
            },
        );

        match outcome.failure {
            None => Ok(CloseSummary {
                closed_accounts,
                confirmed_batches: outcome.confirmed,
                signature,
            }),
            Some(failure) => Err(failure),
        }
    }

    /// Burns `amount` (human-scale) from the given token account. Rejected
    /// before anything is built or recorded when the amount is not in
    /// `(0, balance]`. Destructive and irreversible once confirmed.
    pub async fn burn(
        &mut self,
        address: Pubkey,
        amount: Decimal,
    ) -> Result<BurnSummary, SweepError> {
        let record = self
            .scanner
            .records()
            .iter()
            .find(|r| r.address == address)
            .cloned()
            .ok_or_else(|| SweepError::AccountNotFound(address.to_string()))?;

        let owner = self.wallet();
        // validation failures propagate here, before any transaction or
        // history entry exists
        let (transaction, base_units) = build_burn_transaction(&record, &owner, amount)?;

        let outcome = submit_sequential(
            vec![transaction],
            self.signer.as_ref(),
            self.reader.as_ref(),
            &self.events,
        )
        .await;

        let signature = outcome.last_signature.map(|s| s.to_string());
        self.finish_action(
            ActionKind::Burn,
            &outcome,
            NewHistoryEntry {
                kind: ActionKind::Burn,
                status: status_of(&outcome),
                mint: Some(record.mint.to_string()),
                amount: Some(amount),
                count: None,
                signature: signature.clone(),
            },
        );

        match outcome.failure {
            None => Ok(BurnSummary { base_units, signature }),
            Some(failure) => Err(failure),
        }
    }

    /// This wallet's action log, newest first.
    pub fn load_history(&self) -> Vec<HistoryEntry> {
        self.history.load(&self.wallet())
    }

    /// Deletes this wallet's entire action log.
    pub fn clear_history(&self) {
        self.history.clear(&self.wallet());
    }

    pub fn explorer_link(&self, signature: &str) -> String {
        format!("{}/tx/{signature}", self.explorer_url)
    }

    fn finish_action(&self, kind: ActionKind, outcome: &SubmitOutcome, entry: NewHistoryEntry) {
        let status = entry.status;
        let signature = entry.signature.clone();
        self.history.record(&self.wallet(), entry);
        self.events.emit(EngineEvent::ActionCompleted {
            kind,
            status,
            signature: signature.clone(),
            explorer_url: signature.map(|s| self.explorer_link(&s)),
        });
        if let Some(failure) = &outcome.failure {
            if failure.is_cancellation() {
                log::info!("{kind:?} cancelled by wallet");
            } else {
                log::warn!("{kind:?} failed: {failure}");
            }
        }
    }
}

fn status_of(outcome: &SubmitOutcome) -> ActionStatus {
    match &outcome.failure {
        None => ActionStatus::Success,
        Some(failure) if failure.is_cancellation() => ActionStatus::Cancelled,
        Some(_) => ActionStatus::Error,
    }
}
