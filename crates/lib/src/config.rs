use crate::{
    constant::{DEFAULT_EXPLORER_URL, DEFAULT_RPC_URL},
    error::SweepError,
    history::HistoryStore,
    sanitize_error,
};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Tool configuration, loaded from a TOML file. Every field has a default
/// so a missing file just means "all defaults"; command-line flags override
/// whatever the file says.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON-RPC endpoint.
    pub rpc_url: String,
    /// Wallet key: path to a JSON keypair file, a base58 string, or a
    /// u8-array literal.
    pub keypair: Option<String>,
    /// Base URL for transaction deep links.
    pub explorer_url: String,
    /// Where per-wallet history files live.
    pub history_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            keypair: None,
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            history_dir: None,
        }
    }
}

impl Config {
    pub fn load_config(path: &str) -> Result<Self, SweepError> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            SweepError::InternalError(format!(
                "Failed to read config file {path}: {}",
                sanitize_error!(e)
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            SweepError::ValidationError(format!(
                "Invalid config file {path}: {}",
                sanitize_error!(e)
            ))
        })
    }

    pub fn history_dir(&self) -> PathBuf {
        self.history_dir.clone().unwrap_or_else(HistoryStore::default_dir)
    }
}
