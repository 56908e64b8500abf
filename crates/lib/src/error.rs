use crate::sanitize_error;
use serde::{Deserialize, Serialize};
use solana_client::client_error::ClientError;
use solana_program::program_error::ProgramError;
use solana_sdk::signature::SignerError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub enum SweepError {
    #[error("Account {0} not found")]
    AccountNotFound(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Scan failed: {0}")]
    ScanFailed(String),

    #[error("Estimation failed: {0}")]
    EstimationFailed(String),

    /// The wallet declined to sign. Not a system fault; callers surface it
    /// as a neutral cancellation.
    #[error("Signing cancelled: {0}")]
    SigningCancelled(String),

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SweepError {
    /// Terminal outcomes that are user choices rather than faults.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SweepError::SigningCancelled(_))
    }
}

impl From<ClientError> for SweepError {
    fn from(e: ClientError) -> Self {
        let error_string = e.to_string();
        if error_string.contains("AccountNotFound")
            || error_string.contains("could not find account")
        {
            SweepError::AccountNotFound(sanitize_error!(error_string))
        } else {
            SweepError::RpcError(sanitize_error!(error_string))
        }
    }
}

impl From<SignerError> for SweepError {
    fn from(e: SignerError) -> Self {
        SweepError::SubmissionFailed(sanitize_error!(e))
    }
}

impl From<ProgramError> for SweepError {
    fn from(e: ProgramError) -> Self {
        SweepError::InternalError(sanitize_error!(e))
    }
}

impl From<std::io::Error> for SweepError {
    fn from(e: std::io::Error) -> Self {
        SweepError::InternalError(sanitize_error!(e))
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(e: serde_json::Error) -> Self {
        SweepError::SerializationError(sanitize_error!(e))
    }
}

impl From<bs58::decode::Error> for SweepError {
    fn from(e: bs58::decode::Error) -> Self {
        SweepError::SerializationError(sanitize_error!(e))
    }
}
