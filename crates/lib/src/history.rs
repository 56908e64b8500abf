use crate::constant::{HISTORY_KEY_PREFIX, MAX_HISTORY_ENTRIES};
use chrono::Utc;
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Burn,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Cancelled,
    Error,
}

/// One recorded user action, newest entries first in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// Unix milliseconds at creation.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Outcome of an action before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub kind: ActionKind,
    pub status: ActionStatus,
    pub mint: Option<String>,
    pub amount: Option<Decimal>,
    pub count: Option<usize>,
    pub signature: Option<String>,
}

/// Durable per-wallet action log: one JSON file per wallet, capped at
/// [`MAX_HISTORY_ENTRIES`], newest first.
///
/// History is best-effort bookkeeping, not a source of truth for on-chain
/// state: loads degrade to an empty list and failed writes are logged and
/// dropped.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_dir().map(|d| d.join("sweep")).unwrap_or_else(|| PathBuf::from("."))
    }

    fn wallet_file(&self, wallet: &Pubkey) -> PathBuf {
        self.dir.join(format!("{HISTORY_KEY_PREFIX}{wallet}.json"))
    }

    /// Stamps `entry` with an id and timestamp, prepends it to the wallet's
    /// log, and evicts beyond the cap. Returns the stored entry.
    pub fn record(&self, wallet: &Pubkey, entry: NewHistoryEntry) -> HistoryEntry {
        let now = Utc::now().timestamp_millis();
        let entry = HistoryEntry {
            // millisecond clock plus a random tiebreak for same-instant entries
            id: format!("{now}-{:08x}", rand::random::<u32>()),
            timestamp: now,
            kind: entry.kind,
            status: entry.status,
            mint: entry.mint,
            amount: entry.amount,
            count: entry.count,
            signature: entry.signature,
        };

        let mut entries = self.load(wallet);
        entries.insert(0, entry.clone());
        entries.truncate(MAX_HISTORY_ENTRIES);
        self.save(&self.wallet_file(wallet), &entries);

        entry
    }

    /// Current log for `wallet`, newest first. Empty on any read or parse
    /// failure.
    pub fn load(&self, wallet: &Pubkey) -> Vec<HistoryEntry> {
        let path = self.wallet_file(wallet);
        if !path.exists() {
            return Vec::new();
        }
        let data = fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&data).unwrap_or_default()
    }

    /// Deletes the wallet's entire log.
    pub fn clear(&self, wallet: &Pubkey) {
        let _ = fs::remove_file(self.wallet_file(wallet));
    }

    fn save(&self, path: &Path, entries: &[HistoryEntry]) {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            log::warn!("failed to create history directory: {e}");
            return;
        }
        match serde_json::to_string_pretty(entries) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("failed to write history for {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("failed to serialize history: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn burn_entry(amount: Decimal) -> NewHistoryEntry {
        NewHistoryEntry {
            kind: ActionKind::Burn,
            status: ActionStatus::Success,
            mint: Some(Pubkey::new_unique().to_string()),
            amount: Some(amount),
            count: None,
            signature: Some("sig".to_string()),
        }
    }

    fn close_entry(count: usize, status: ActionStatus) -> NewHistoryEntry {
        NewHistoryEntry {
            kind: ActionKind::Close,
            status,
            mint: None,
            amount: None,
            count: Some(count),
            signature: None,
        }
    }

    #[test]
    fn test_record_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());
        let wallet = Pubkey::new_unique();

        let stored = store.record(&wallet, burn_entry(dec!(1.5)));
        let loaded = store.load(&wallet);
        assert_eq!(loaded, vec![stored]);
        assert_eq!(loaded[0].kind, ActionKind::Burn);
        assert_eq!(loaded[0].amount, Some(dec!(1.5)));
    }

    #[test]
    fn test_newest_first() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());
        let wallet = Pubkey::new_unique();

        let first = store.record(&wallet, close_entry(3, ActionStatus::Success));
        let second = store.record(&wallet, close_entry(7, ActionStatus::Success));

        let loaded = store.load(&wallet);
        assert_eq!(loaded[0].id, second.id);
        assert_eq!(loaded[1].id, first.id);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());
        let wallet = Pubkey::new_unique();

        for i in 0..150 {
            store.record(&wallet, close_entry(i, ActionStatus::Success));
        }

        let loaded = store.load(&wallet);
        assert_eq!(loaded.len(), MAX_HISTORY_ENTRIES);
        // newest first: counts 149 down to 50 survive
        assert_eq!(loaded[0].count, Some(149));
        assert_eq!(loaded[99].count, Some(50));
    }

    #[test]
    fn test_per_wallet_isolation() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());
        let wallet_a = Pubkey::new_unique();
        let wallet_b = Pubkey::new_unique();

        store.record(&wallet_a, burn_entry(dec!(2)));

        assert_eq!(store.load(&wallet_b), vec![]);
        assert_eq!(store.load(&wallet_a).len(), 1);
    }

    #[test]
    fn test_clear_removes_only_that_wallet() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());
        let wallet_a = Pubkey::new_unique();
        let wallet_b = Pubkey::new_unique();

        store.record(&wallet_a, burn_entry(dec!(1)));
        store.record(&wallet_b, close_entry(2, ActionStatus::Cancelled));
        store.clear(&wallet_a);

        assert_eq!(store.load(&wallet_a), vec![]);
        assert_eq!(store.load(&wallet_b).len(), 1);
    }

    #[test]
    fn test_load_missing_wallet_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());
        assert_eq!(store.load(&Pubkey::new_unique()), vec![]);
    }

    #[test]
    fn test_corrupted_file_degrades_to_empty() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());
        let wallet = Pubkey::new_unique();

        store.record(&wallet, burn_entry(dec!(1)));
        fs::write(tmp.path().join(format!("{HISTORY_KEY_PREFIX}{wallet}.json")), "not json")
            .unwrap();

        assert_eq!(store.load(&wallet), vec![]);
    }

    #[test]
    fn test_status_serialized_lowercase() {
        let tmp = TempDir::new().unwrap();
        let store = HistoryStore::new(tmp.path());
        let wallet = Pubkey::new_unique();

        store.record(&wallet, close_entry(12, ActionStatus::Cancelled));
        let raw = fs::read_to_string(
            tmp.path().join(format!("{HISTORY_KEY_PREFIX}{wallet}.json")),
        )
        .unwrap();
        assert!(raw.contains("\"type\": \"close\""));
        assert!(raw.contains("\"status\": \"cancelled\""));
    }
}
