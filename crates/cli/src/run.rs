use crate::args::GlobalArgs;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use sweep_lib::{
    account::TokenAccountRecord,
    client::{get_rpc_client, RpcLedgerReader},
    constant::BATCH_SIZE,
    engine::SweepEngine,
    error::SweepError,
    events::{EngineEvent, EventSink},
    history::{ActionKind, ActionStatus, HistoryEntry, HistoryStore},
    signer::{parse_keypair, KeypairWallet},
    token::ProgramVariant,
    Config,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;

use crate::Commands;

pub async fn handle(command: Commands, args: GlobalArgs) -> Result<(), SweepError> {
    let config = Config::load_config(&args.config)?;
    let rpc_client = get_rpc_client(&args.rpc_url);

    let encoded_key =
        args.keypair.clone().or_else(|| config.keypair.clone()).ok_or_else(|| {
            SweepError::ValidationError(
                "a wallet keypair is required; pass --keypair or set `keypair` in sweep.toml"
                    .to_string(),
            )
        })?;
    let keypair = parse_keypair(&encoded_key)?;

    let reader = Arc::new(RpcLedgerReader::new(rpc_client.clone()));
    let signer = Arc::new(KeypairWallet::new(keypair, rpc_client));

    let (tx, rx) = mpsc::unbounded_channel();
    let printer = spawn_event_printer(rx);

    let mut engine = SweepEngine::new(
        reader,
        signer,
        HistoryStore::new(config.history_dir()),
        config.explorer_url.clone(),
        EventSink::new(tx),
    );

    let result = match command {
        Commands::Scan { all } => run_scan(&mut engine, all).await,
        Commands::Close { execute, account } => run_close(&mut engine, execute, account).await,
        Commands::Burn { account, amount, execute } => {
            run_burn(&mut engine, account, amount, execute).await
        }
        Commands::History { kind, clear } => run_history(&engine, kind, clear),
    };

    // dropping the engine closes the event channel; drain before reporting
    drop(engine);
    let _ = printer.await;

    match result {
        // a declined signature is a user choice, not an error exit
        Err(e) if e.is_cancellation() => {
            println!("Cancelled: already confirmed batches stand; re-scan to see what's left.");
            Ok(())
        }
        other => other,
    }
}

async fn run_scan(engine: &mut SweepEngine, all: bool) -> Result<(), SweepError> {
    engine.scan().await?;

    // the estimate is advisory; a failed fetch shouldn't hide the listing
    if let Err(e) = engine.estimate_reclaim().await {
        log::warn!("{e}");
    }

    print_records(engine.records(), all);
    Ok(())
}

async fn run_close(
    engine: &mut SweepEngine,
    execute: bool,
    account: Option<Pubkey>,
) -> Result<(), SweepError> {
    engine.scan().await?;

    let targets: Vec<TokenAccountRecord> = match account {
        Some(address) => {
            let record = engine
                .records()
                .iter()
                .find(|r| r.address == address)
                .cloned()
                .ok_or_else(|| SweepError::AccountNotFound(address.to_string()))?;
            if !record.is_empty() {
                return Err(SweepError::ValidationError(format!(
                    "account {address} still holds {} tokens; burn or transfer them first",
                    record.display_amount()
                )));
            }
            vec![record]
        }
        None => engine.records().iter().filter(|r| r.is_empty()).cloned().collect(),
    };

    if targets.is_empty() {
        println!("No empty accounts to close.");
        return Ok(());
    }

    if !execute {
        if account.is_none() {
            if let Err(e) = engine.estimate_reclaim().await {
                log::warn!("{e}");
            }
        }
        for record in &targets {
            println!("[DRY RUN] would close {} (mint {})", record.address, record.mint);
        }
        println!(
            "{} accounts in {} transactions; pass --execute to close them.",
            targets.len(),
            targets.len().div_ceil(BATCH_SIZE)
        );
        return Ok(());
    }

    let summary = match account {
        Some(address) => engine.close_account(address).await?,
        None => engine.close_empty_accounts().await?,
    };
    println!(
        "Closed {} accounts in {} transactions.",
        summary.closed_accounts, summary.confirmed_batches
    );
    Ok(())
}

async fn run_burn(
    engine: &mut SweepEngine,
    account: Pubkey,
    amount: Decimal,
    execute: bool,
) -> Result<(), SweepError> {
    engine.scan().await?;

    let record = engine
        .records()
        .iter()
        .find(|r| r.address == account)
        .cloned()
        .ok_or_else(|| SweepError::AccountNotFound(account.to_string()))?;

    // validates the amount and shows the exact base units before anything
    // is submitted
    let (_, base_units) =
        sweep_lib::burn::build_burn_transaction(&record, &engine.wallet(), amount)?;

    println!("WARNING: burning is irreversible and permanently reduces the token supply.");
    if !execute {
        println!(
            "[DRY RUN] would burn {amount} tokens ({base_units} base units) of mint {} from {account}; pass --execute to burn.",
            record.mint
        );
        return Ok(());
    }

    let summary = engine.burn(account, amount).await?;
    println!("Burned {amount} tokens ({} base units).", summary.base_units);
    Ok(())
}

fn run_history(
    engine: &SweepEngine,
    kind: Option<ActionKind>,
    clear: bool,
) -> Result<(), SweepError> {
    if clear {
        engine.clear_history();
        println!("History cleared for {}", engine.wallet());
        return Ok(());
    }

    let entries = engine.load_history();
    let burns = entries.iter().filter(|e| e.kind == ActionKind::Burn).count();
    println!(
        "{} entries for {} ({} burns, {} closes)",
        entries.len(),
        engine.wallet(),
        burns,
        entries.len() - burns
    );

    for entry in entries.iter().filter(|e| kind.is_none_or(|k| e.kind == k)) {
        print_entry(engine, entry);
    }
    Ok(())
}

fn print_entry(engine: &SweepEngine, entry: &HistoryEntry) {
    let when = chrono::DateTime::from_timestamp_millis(entry.timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| entry.timestamp.to_string());

    let what = match entry.kind {
        ActionKind::Burn => format!(
            "burn {} of {}",
            entry.amount.map(|a| a.to_string()).unwrap_or_else(|| "?".to_string()),
            entry.mint.as_deref().unwrap_or("?"),
        ),
        ActionKind::Close => format!("close {} accounts", entry.count.unwrap_or(0)),
    };

    let status = match entry.status {
        ActionStatus::Success => "ok",
        ActionStatus::Cancelled => "cancelled",
        ActionStatus::Error => "error",
    };

    println!("{when}  [{status:>9}]  {what}");
    if let Some(signature) = &entry.signature {
        println!("{:21}{}", "", engine.explorer_link(signature));
    }
}

fn print_records(records: &[TokenAccountRecord], all: bool) {
    println!("{:<44}  {:<44}  {:>20}  {}", "Account", "Mint", "Balance", "Program");
    let mut empty = 0;
    for record in records {
        if record.is_empty() {
            empty += 1;
        } else if !all {
            continue;
        }
        // Pubkey's Display ignores width specifiers; pad the strings
        let address = record.address.to_string();
        let mint = record.mint.to_string();
        let balance = record.display_amount().to_string();
        println!("{address:<44}  {mint:<44}  {balance:>20}  {}", program_label(record.program));
    }
    if !all {
        println!("{empty} empty accounts shown; use --all to include funded ones.");
    }
}

fn program_label(program: ProgramVariant) -> &'static str {
    match program {
        ProgramVariant::Token => "spl-token",
        ProgramVariant::Token2022 => "token-2022",
    }
}

fn spawn_event_printer(mut rx: UnboundedReceiver<EngineEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                EngineEvent::ScanStarted => println!("Scanning token accounts..."),
                EngineEvent::ScanCompleted { accounts } => {
                    println!("Found {accounts} token accounts");
                }
                EngineEvent::EstimateUpdated { lamports, sol } => {
                    println!("Estimated reclaim: {sol} SOL ({lamports} lamports)");
                }
                EngineEvent::BatchProgress { done, total } => {
                    println!("Confirmed batch {done}/{total}");
                }
                EngineEvent::ActionCompleted { kind, status, explorer_url, .. } => {
                    let label = match kind {
                        ActionKind::Burn => "Burn",
                        ActionKind::Close => "Close",
                    };
                    let outcome = match status {
                        ActionStatus::Success => "succeeded",
                        ActionStatus::Cancelled => "cancelled",
                        ActionStatus::Error => "failed",
                    };
                    println!("{label} {outcome}");
                    if let Some(url) = explorer_url {
                        println!("  {url}");
                    }
                }
                EngineEvent::Status(message) => println!("{message}"),
            }
        }
    })
}
