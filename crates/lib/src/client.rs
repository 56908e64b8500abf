use crate::{error::SweepError, token::ProgramVariant};
use async_trait::async_trait;
use mockall::automock;
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_request::TokenAccountsFilter,
    rpc_response::RpcKeyedAccount,
};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature};
use std::{sync::Arc, time::Duration};

pub fn get_rpc_client(rpc_url: &str) -> Arc<RpcClient> {
    Arc::new(RpcClient::new_with_timeout_and_commitment(
        rpc_url.to_string(),
        Duration::from_secs(90),
        CommitmentConfig::confirmed(),
    ))
}

/// Read-only view of the ledger. The engine owns no transport; everything
/// it learns about chain state comes through this seam, which keeps the
/// pipeline testable without a validator.
#[automock]
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// All token accounts `owner` holds under one program variant, in
    /// network response order.
    async fn token_accounts_by_owner(
        &self,
        owner: Pubkey,
        variant: ProgramVariant,
    ) -> Result<Vec<RpcKeyedAccount>, SweepError>;

    /// Minimum lamport balance for rent exemption at `data_len` bytes.
    async fn minimum_rent_exemption(&self, data_len: usize) -> Result<u64, SweepError>;

    async fn latest_blockhash(&self) -> Result<Hash, SweepError>;

    /// Waits until `signature` is confirmed or the blockhash it was built
    /// against expires. A timeout is a confirmation failure like any other.
    async fn confirm_transaction(
        &self,
        signature: Signature,
        blockhash: Hash,
    ) -> Result<(), SweepError>;
}

/// Production reader over a JSON-RPC endpoint at `confirmed` commitment.
pub struct RpcLedgerReader {
    rpc_client: Arc<RpcClient>,
}

impl RpcLedgerReader {
    pub fn new(rpc_client: Arc<RpcClient>) -> Self {
        Self { rpc_client }
    }
}

#[async_trait]
impl LedgerReader for RpcLedgerReader {
    async fn token_accounts_by_owner(
        &self,
        owner: Pubkey,
        variant: ProgramVariant,
    ) -> Result<Vec<RpcKeyedAccount>, SweepError> {
        let accounts = self
            .rpc_client
            .get_token_accounts_by_owner(
                &owner,
                TokenAccountsFilter::ProgramId(variant.program_id()),
            )
            .await?;
        Ok(accounts)
    }

    async fn minimum_rent_exemption(&self, data_len: usize) -> Result<u64, SweepError> {
        let lamports =
            self.rpc_client.get_minimum_balance_for_rent_exemption(data_len).await?;
        Ok(lamports)
    }

    async fn latest_blockhash(&self) -> Result<Hash, SweepError> {
        let blockhash = self.rpc_client.get_latest_blockhash().await?;
        Ok(blockhash)
    }

    async fn confirm_transaction(
        &self,
        signature: Signature,
        blockhash: Hash,
    ) -> Result<(), SweepError> {
        self.rpc_client
            .confirm_transaction_with_spinner(
                &signature,
                &blockhash,
                CommitmentConfig::confirmed(),
            )
            .await?;
        Ok(())
    }
}
