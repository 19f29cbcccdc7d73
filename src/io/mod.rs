//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `seed` - Loading persisted balances and rewards into a store
//! - `sync_reader` - Synchronous claim request reader with iterator interface
//! - `async_reader` - Asynchronous claim request reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod seed;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{write_balances_csv, write_outcomes_csv, write_stock_csv};
pub use seed::{load_balances, load_rewards, load_seed_files, SeedSummary};
pub use sync_reader::SyncReader;
