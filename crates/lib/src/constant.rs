pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Packed size of an SPL token account; rent exemption is quoted for it.
pub const TOKEN_ACCOUNT_SIZE: usize = 165;

/// Close instructions per transaction. Keeps each transaction well under the
/// packet size ceiling while minimizing signing prompts and round-trips.
pub const BATCH_SIZE: usize = 12;

/// Per-wallet history cap; oldest entries are evicted first.
pub const MAX_HISTORY_ENTRIES: usize = 100;

pub const HISTORY_KEY_PREFIX: &str = "tx_history_";

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_EXPLORER_URL: &str = "https://solscan.io";
