use clap::Parser;

/// Global arguments used by all subcommands
#[derive(Debug, Parser)]
#[command(name = "sweep")]
pub struct GlobalArgs {
    /// Solana RPC endpoint URL
    #[arg(long, env = "RPC_URL", default_value = "https://api.mainnet-beta.solana.com")]
    pub rpc_url: String,

    /// Wallet key: path to a JSON keypair file, a base58 string, or a
    /// u8-array literal. Falls back to the config file.
    #[arg(long, env = "SWEEP_KEYPAIR")]
    pub keypair: Option<String>,

    /// Path to sweep configuration file (TOML format)
    #[arg(long, default_value = "sweep.toml")]
    pub config: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "standard")]
    pub logging_format: sweep_lib::log::LoggingFormat,
}
