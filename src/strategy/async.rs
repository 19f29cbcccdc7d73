//! Asynchronous batch processing strategy
//!
//! This module provides a concurrent, multi-threaded implementation of the
//! ProcessingStrategy trait. Claim requests are read in batches and every
//! request of a batch runs as its own tokio task, so claims on a shared reward
//! genuinely race and the ledger store decides the winners.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent)
//!     ├── AsyncReader (batch CSV reading)
//!     └── ClaimDispatcher (one task per request)
//!         └── ClaimCoordinator
//!             └── Arc<LedgerStore> (DashMap-guarded rows)
//! ```
//!
//! Batches are dispatched one after another; requests inside a batch have no
//! ordering relative to each other. Outcome rows are still written sorted by
//! request ID, but which of two competing requests wins, and the claim IDs
//! handed out, may differ from run to run.

use crate::core::{ClaimCoordinator, ClaimDispatcher, LedgerStore};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_outcomes_csv;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how many requests are read per batch and the number of worker
/// threads running claim tasks.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of claim requests per batch
    pub batch_size: usize,
    /// Number of runtime worker threads executing claims concurrently
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values are replaced by the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "Invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            tracing::warn!(
                max_concurrent,
                default = default.max_concurrent,
                "Invalid worker count, using default"
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// # Configuration
///
/// The strategy accepts a BatchConfig with:
/// - `batch_size`: Number of requests per batch (default: 1000)
/// - `max_concurrent`: Number of worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Replay claims from the input file concurrently
    ///
    /// 1. Creates a tokio multi-threaded runtime with the configured workers
    /// 2. Reads requests in batches using AsyncReader
    /// 3. Dispatches each batch and waits for it before reading the next
    /// 4. Writes all outcomes, sorted by request ID
    ///
    /// Fatal errors (file not found, runtime errors, output errors) are
    /// returned immediately. Malformed rows are logged and skipped.
    fn process(
        &self,
        store: Arc<LedgerStore>,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let dispatcher = ClaimDispatcher::new(ClaimCoordinator::new(store));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async reads futures-io, tokio files need the compat layer
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut results = Vec::new();
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                tracing::debug!(size = batch.len(), "Dispatching claim batch");
                results.extend(dispatcher.dispatch_batch(batch).await);
            }

            write_outcomes_csv(&results, output)
        })
    }
}
