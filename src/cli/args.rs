use crate::core::{ClaimPolicy, LedgerConfig};
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Replay reward claims against a persisted points ledger
#[derive(Parser, Debug)]
#[command(name = "rewards-ledger")]
#[command(about = "Replay reward claims against a points ledger", long_about = None)]
pub struct CliArgs {
    /// Claims CSV file path (`request,user,reward`)
    #[arg(value_name = "CLAIMS", help = "Path to the claims CSV file")]
    pub claims_file: PathBuf,

    /// User balances snapshot (`user,points`)
    #[arg(long = "users", value_name = "PATH", help = "Path to the users CSV file")]
    pub users_file: PathBuf,

    /// Reward catalogue snapshot (`reward,title,description,points_required,stock`)
    #[arg(
        long = "rewards",
        value_name = "PATH",
        help = "Path to the rewards CSV file"
    )]
    pub rewards_file: PathBuf,

    /// Processing strategy used to replay claims
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for concurrent replay"
    )]
    pub strategy: StrategyType,

    /// Number of claim requests per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of claim requests per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads running claims concurrently (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,

    /// How long a claim waits for its reward and user rows
    #[arg(
        long = "lock-timeout-ms",
        value_name = "MILLIS",
        default_value_t = 500,
        help = "Lock wait in milliseconds before a claim fails with a storage error"
    )]
    pub lock_timeout_ms: u64,

    /// Reject repeat claims of the same reward by the same user
    #[arg(long = "once-per-user")]
    pub once_per_user: bool,

    /// Write the final balances here
    #[arg(long = "balances-out", value_name = "PATH")]
    pub balances_out: Option<PathBuf>,

    /// Write the final reward stock here
    #[arg(long = "stock-out", value_name = "PATH")]
    pub stock_out: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long = "log-level", value_name = "FILTER", default_value = "warn")]
    pub log_level: String,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced
    /// with a warning by `BatchConfig::new`.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent.unwrap_or(default.max_concurrent),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create the ledger configuration from CLI arguments
    pub fn to_ledger_config(&self) -> LedgerConfig {
        let claim_policy = if self.once_per_user {
            ClaimPolicy::OncePerUser
        } else {
            ClaimPolicy::Unrestricted
        };

        LedgerConfig::new(Duration::from_millis(self.lock_timeout_ms), claim_policy)
    }
}
