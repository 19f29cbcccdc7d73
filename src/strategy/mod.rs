//! Processing strategy module for claim replay
//!
//! This module defines the Strategy pattern for complete claim processing
//! pipelines, encompassing both CSV parsing and claim submission. This allows
//! different processing implementations (sequential, concurrent) to be
//! selected at runtime.

use crate::cli::StrategyType;
use crate::core::LedgerStore;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete claim processing pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Replay claim requests from a file against a store and write outcomes
    ///
    /// # Arguments
    ///
    /// * `store` - The seeded ledger the claims run against
    /// * `input_path` - Path to the claims CSV file
    /// * `output` - Writer receiving one outcome row per request
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal problems (input cannot be opened,
    /// output cannot be written, runtime cannot start). Malformed request rows
    /// are logged and skipped; rejected claims are regular outcome rows.
    fn process(
        &self,
        store: Arc<LedgerStore>,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
