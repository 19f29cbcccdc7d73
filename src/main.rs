//! Rewards Ledger CLI
//!
//! Command-line interface for replaying reward claims against a ledger
//! loaded from CSV snapshots.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --users users.csv --rewards rewards.csv claims.csv > outcomes.csv
//! cargo run -- --users users.csv --rewards rewards.csv --strategy sync claims.csv > outcomes.csv
//! cargo run -- --users users.csv --rewards rewards.csv --strategy async --batch-size 2000 \
//!     --max-concurrent 8 --balances-out balances.csv --stock-out stock.csv claims.csv
//! ```
//!
//! The program seeds a ledger from the users and rewards files, replays every
//! claim request through the selected processing strategy, and writes one
//! outcome row per request to stdout. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success (rejected claims are regular outcomes)
//! - 1: Error (unreadable or malformed snapshot, missing claims file, etc.)

use rewards_ledger::cli::{self, CliArgs};
use rewards_ledger::core::{Ledger, LedgerStore};
use rewards_ledger::io::{load_seed_files, write_balances_csv, write_stock_csv};
use rewards_ledger::strategy;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process;
use std::sync::Arc;

fn main() {
    let args = cli::parse_args();
    cli::init_tracing(&args.log_level);

    if let Err(e) = run(&args) {
        tracing::error!(error = %e, "Claim replay failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), String> {
    let store = LedgerStore::with_config(args.to_ledger_config());
    let summary =
        load_seed_files(&store, &args.users_file, &args.rewards_file).map_err(|e| e.to_string())?;
    tracing::info!(
        users = summary.users,
        rewards = summary.rewards,
        "Ledger seeded"
    );
    let store = Arc::new(store);

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let mut output = std::io::stdout();
    strategy.process(Arc::clone(&store), &args.claims_file, &mut output)?;
    tracing::info!(claims = store.claim_count(), "Claim replay finished");

    if let Some(path) = &args.balances_out {
        write_balances_csv(&store.balances(), &mut create_output(path)?)?;
    }
    if let Some(path) = &args.stock_out {
        write_stock_csv(&store.rewards(), &mut create_output(path)?)?;
    }

    Ok(())
}

fn create_output(path: &Path) -> Result<BufWriter<File>, String> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| format!("Failed to create file '{}': {}", path.display(), e))
}
