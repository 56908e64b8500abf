pub mod keypair;

pub use keypair::{parse_keypair, KeypairWallet};

use crate::error::SweepError;
use async_trait::async_trait;
use mockall::automock;
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::Transaction};

/// The wallet seam: whoever holds the keys signs and submits.
///
/// `sign_and_submit` fails with [`SweepError::SigningCancelled`] when the
/// wallet declines the request (a user choice, not a fault) and
/// [`SweepError::SubmissionFailed`] for everything else.
#[automock]
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// The connected wallet identity; owner of every account we touch and
    /// destination for reclaimed rent.
    fn pubkey(&self) -> Pubkey;

    /// Signs `transaction` (its blockhash already set) and submits it,
    /// returning the network signature. Does not wait for confirmation.
    async fn sign_and_submit(&self, transaction: Transaction)
        -> Result<Signature, SweepError>;
}
