//! Synchronous processing strategy
//!
//! Replays claim requests one at a time, in file order, through a
//! `ClaimCoordinator`. With no concurrency the outcome of every request is
//! deterministic, including claim IDs, which makes this strategy the
//! reference for the concurrent one.

use crate::core::{ClaimCoordinator, LedgerStore};
use crate::io::csv_format::write_outcomes_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::ProcessedClaim;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rewards_ledger::core::LedgerStore;
/// use rewards_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let store = Arc::new(LedgerStore::new());
/// let mut output = std::io::stdout();
///
/// SyncProcessingStrategy
///     .process(store, Path::new("claims.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        store: Arc<LedgerStore>,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let coordinator = ClaimCoordinator::new(store);
        let reader = SyncReader::new(input_path)?;

        let mut results = Vec::new();
        for result in reader {
            match result {
                Ok(request) => {
                    let outcome = coordinator.submit(request);
                    results.push(ProcessedClaim { request, outcome });
                }
                Err(e) => tracing::warn!(error = %e, "Skipping malformed claim record"),
            }
        }

        write_outcomes_csv(&results, output)
    }
}
