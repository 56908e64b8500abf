mod args;
mod run;

use args::GlobalArgs;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use sweep_lib::{error::SweepError, history::ActionKind, log::LoggingFormat};

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the wallet's token accounts and estimate reclaimable rent
    Scan {
        /// List every account, not just the empty ones
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Close empty token accounts, reclaiming their rent to the wallet
    Close {
        /// Perform the closes (default is dry-run)
        #[arg(long, default_value_t = false)]
        execute: bool,

        /// Close a single account instead of every empty one
        #[arg(long)]
        account: Option<Pubkey>,
    },
    /// Burn tokens from one token account. Irreversible
    Burn {
        /// The token account to burn from
        #[arg(long)]
        account: Pubkey,

        /// Human-scale amount to burn
        #[arg(long)]
        amount: Decimal,

        /// Perform the burn (default is a preview)
        #[arg(long, default_value_t = false)]
        execute: bool,
    },
    /// Show or clear this wallet's action history
    History {
        /// Only show entries of one kind
        #[arg(long, value_enum)]
        kind: Option<ActionKind>,

        /// Delete the wallet's entire history
        #[arg(long, default_value_t = false)]
        clear: bool,
    },
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "sweep - reclaim rent from empty token accounts",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

#[tokio::main]
async fn main() -> Result<(), SweepError> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    setup_logging(&cli.global_args.logging_format);

    if let Err(e) = run::handle(cli.command, cli.global_args).await {
        print_error(&format!("{e}"));
        std::process::exit(1);
    }

    Ok(())
}

fn print_error(message: &str) {
    eprintln!("Error: {message}");
}

fn setup_logging(format: &LoggingFormat) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter);
    match format {
        LoggingFormat::Standard => subscriber.init(),
        LoggingFormat::Json => subscriber.json().init(),
    }
}
