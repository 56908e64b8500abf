use crate::{
    client::LedgerReader,
    error::SweepError,
    events::{EngineEvent, EventSink},
    signer::WalletSigner,
};
use solana_sdk::{signature::Signature, transaction::Transaction};

/// What a sequential submission run accomplished before it finished or was
/// cut short. Confirmed transactions are final regardless of `failure`;
/// unsubmitted ones are abandoned, never retried here.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub confirmed: usize,
    pub total: usize,
    /// Signature of the most recently submitted transaction, kept even when
    /// its confirmation subsequently failed.
    pub last_signature: Option<Signature>,
    pub failure: Option<SweepError>,
}

impl SubmitOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.confirmed == self.total
    }
}

/// Submits `transactions` strictly in order: stamp a fresh blockhash, sign
/// and submit, await confirmation; only then move to the next one. The loop
/// stops at the first failure (a declined signature surfaces as
/// [`SweepError::SigningCancelled`], anything else as
/// [`SweepError::SubmissionFailed`]) and emits a progress event after each
/// confirmation.
pub async fn submit_sequential(
    transactions: Vec<Transaction>,
    signer: &dyn WalletSigner,
    reader: &dyn LedgerReader,
    events: &EventSink,
) -> SubmitOutcome {
    let total = transactions.len();
    let mut outcome =
        SubmitOutcome { confirmed: 0, total, last_signature: None, failure: None };

    for mut transaction in transactions {
        // prior submissions may have outlived the previous blockhash
        let blockhash = match reader.latest_blockhash().await {
            Ok(hash) => hash,
            Err(e) => {
                outcome.failure = Some(SweepError::SubmissionFailed(e.to_string()));
                return outcome;
            }
        };

        transaction.message.recent_blockhash = blockhash;

        let signature = match signer.sign_and_submit(transaction).await {
            Ok(signature) => signature,
            Err(e) => {
                // preserves the cancelled-vs-failed distinction from the wallet
                outcome.failure = Some(e);
                return outcome;
            }
        };
        outcome.last_signature = Some(signature);

        if let Err(e) = reader.confirm_transaction(signature, blockhash).await {
            outcome.failure = Some(SweepError::SubmissionFailed(e.to_string()));
            return outcome;
        }

        outcome.confirmed += 1;
        events.emit(EngineEvent::BatchProgress { done: outcome.confirmed, total });
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockLedgerReader;
    use crate::signer::MockWalletSigner;
    use crate::token::ProgramVariant;
    use solana_sdk::{hash::Hash, pubkey::Pubkey};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn dummy_transactions(n: usize) -> Vec<Transaction> {
        let payer = Pubkey::new_unique();
        (0..n)
            .map(|_| {
                let ix = ProgramVariant::Token
                    .close_account_instruction(&Pubkey::new_unique(), &payer, &payer)
                    .unwrap();
                Transaction::new_with_payer(&[ix], Some(&payer))
            })
            .collect()
    }

    fn happy_reader() -> MockLedgerReader {
        let mut reader = MockLedgerReader::new();
        reader.expect_latest_blockhash().returning(|| Ok(Hash::new_unique()));
        reader.expect_confirm_transaction().returning(|_, _| Ok(()));
        reader
    }

    #[tokio::test]
    async fn test_all_batches_confirm_in_order() {
        let mut signer = MockWalletSigner::new();
        signer.expect_sign_and_submit().times(3).returning(|_| Ok(Signature::new_unique()));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = submit_sequential(
            dummy_transactions(3),
            &signer,
            &happy_reader(),
            &EventSink::new(tx),
        )
        .await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.confirmed, 3);
        assert!(outcome.last_signature.is_some());

        for done in 1..=3 {
            assert_eq!(
                rx.try_recv().unwrap(),
                EngineEvent::BatchProgress { done, total: 3 }
            );
        }
    }

    #[tokio::test]
    async fn test_declined_signature_halts_the_loop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_mock = calls.clone();

        let mut signer = MockWalletSigner::new();
        // second prompt is declined; the third transaction must never reach
        // the signer
        signer.expect_sign_and_submit().times(2).returning(move |_| {
            if calls_in_mock.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(Signature::new_unique())
            } else {
                Err(SweepError::SigningCancelled("user declined".to_string()))
            }
        });

        let outcome = submit_sequential(
            dummy_transactions(3),
            &signer,
            &happy_reader(),
            &EventSink::none(),
        )
        .await;

        assert_eq!(outcome.confirmed, 1);
        assert_eq!(outcome.total, 3);
        assert!(matches!(outcome.failure, Some(SweepError::SigningCancelled(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_confirmation_failure_keeps_signature() {
        let mut signer = MockWalletSigner::new();
        signer.expect_sign_and_submit().times(1).returning(|_| Ok(Signature::new_unique()));

        let mut reader = MockLedgerReader::new();
        reader.expect_latest_blockhash().returning(|| Ok(Hash::new_unique()));
        reader
            .expect_confirm_transaction()
            .times(1)
            .returning(|_, _| Err(SweepError::RpcError("blockhash expired".to_string())));

        let outcome =
            submit_sequential(dummy_transactions(2), &signer, &reader, &EventSink::none())
                .await;

        assert_eq!(outcome.confirmed, 0);
        // submitted, so the attempt has a signature even though it failed
        assert!(outcome.last_signature.is_some());
        assert!(matches!(outcome.failure, Some(SweepError::SubmissionFailed(_))));
    }

    #[tokio::test]
    async fn test_blockhash_failure_before_first_submit() {
        let signer = MockWalletSigner::new();
        let mut reader = MockLedgerReader::new();
        reader
            .expect_latest_blockhash()
            .returning(|| Err(SweepError::RpcError("down".to_string())));

        let outcome =
            submit_sequential(dummy_transactions(1), &signer, &reader, &EventSink::none())
                .await;

        assert_eq!(outcome.confirmed, 0);
        assert!(outcome.last_signature.is_none());
        assert!(matches!(outcome.failure, Some(SweepError::SubmissionFailed(_))));
    }

    #[tokio::test]
    async fn test_empty_plan_is_complete() {
        let signer = MockWalletSigner::new();
        let reader = MockLedgerReader::new();

        let outcome =
            submit_sequential(Vec::new(), &signer, &reader, &EventSink::none()).await;
        assert!(outcome.is_complete());
        assert_eq!(outcome.total, 0);
    }

    #[tokio::test]
    async fn test_each_batch_gets_a_fresh_blockhash() {
        let mut signer = MockWalletSigner::new();
        signer.expect_sign_and_submit().returning(|_| Ok(Signature::new_unique()));

        let mut reader = MockLedgerReader::new();
        reader.expect_latest_blockhash().times(2).returning(|| Ok(Hash::new_unique()));
        reader.expect_confirm_transaction().returning(|_, _| Ok(()));

        let outcome = submit_sequential(
            dummy_transactions(2),
            &signer,
            &reader,
            &EventSink::none(),
        )
        .await;
        assert!(outcome.is_complete());
    }
}
