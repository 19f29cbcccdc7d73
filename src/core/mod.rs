//! Core business logic module
//!
//! This module contains the reward ledger components:
//! - `traits` - The `Ledger` storage abstraction
//! - `ledger_store` - Balances, reward stock and claim records; the sole mutation surface
//! - `coordinator` - Claim orchestration and outcome mapping
//! - `query` - Read-only accessors for display
//! - `async` - Concurrent claim dispatch on tokio

pub mod r#async;
pub mod coordinator;
pub mod ledger_store;
pub mod query;
pub mod traits;

pub use coordinator::ClaimCoordinator;
pub use ledger_store::{ClaimPolicy, LedgerConfig, LedgerStore};
pub use query::QueryFacade;
pub use r#async::ClaimDispatcher;
pub use traits::Ledger;
