use super::WalletSigner;
use crate::{error::SweepError, sanitize_error};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::{fs, sync::Arc};

/// Parses a private key given in any of the accepted formats:
/// - a path to a JSON keypair file
/// - a U8Array literal: "[0, 1, 2, ...]"
/// - a base58-encoded string
pub fn parse_keypair(private_key: &str) -> Result<Keypair, SweepError> {
    if let Ok(file_content) = fs::read_to_string(private_key) {
        return from_json_array(&file_content);
    }

    let trimmed = private_key.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        return from_json_array(trimmed);
    }

    from_base58(trimmed)
}

fn from_json_array(content: &str) -> Result<Keypair, SweepError> {
    let bytes: Vec<u8> = serde_json::from_str(content.trim()).map_err(|e| {
        SweepError::ValidationError(format!("Invalid keypair file: {}", sanitize_error!(e)))
    })?;
    keypair_from_bytes(&bytes)
}

fn from_base58(private_key: &str) -> Result<Keypair, SweepError> {
    let decoded = bs58::decode(private_key).into_vec().map_err(|e| {
        SweepError::ValidationError(format!("Invalid base58 key: {}", sanitize_error!(e)))
    })?;
    keypair_from_bytes(&decoded)
}

fn keypair_from_bytes(bytes: &[u8]) -> Result<Keypair, SweepError> {
    if bytes.len() != 64 {
        return Err(SweepError::ValidationError(format!(
            "Invalid private key length: expected 64 bytes, got {}",
            bytes.len()
        )));
    }
    Keypair::try_from(bytes).map_err(|e| {
        SweepError::ValidationError(format!("Invalid private key bytes: {}", sanitize_error!(e)))
    })
}

/// [`WalletSigner`] backed by a local keypair, submitting through the same
/// RPC endpoint the reader uses. A local key never declines a signature, so
/// this implementation only fails with `SubmissionFailed`.
pub struct KeypairWallet {
    keypair: Keypair,
    rpc_client: Arc<RpcClient>,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair, rpc_client: Arc<RpcClient>) -> Self {
        Self { keypair, rpc_client }
    }
}

#[async_trait]
impl WalletSigner for KeypairWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_and_submit(
        &self,
        mut transaction: Transaction,
    ) -> Result<Signature, SweepError> {
        let signature = self.keypair.sign_message(&transaction.message.serialize());
        transaction.signatures[0] = signature;

        self.rpc_client
            .send_transaction(&transaction)
            .await
            .map_err(|e| SweepError::SubmissionFailed(sanitize_error!(e)))
    }
}
