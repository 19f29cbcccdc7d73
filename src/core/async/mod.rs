//! Asynchronous claim processing
//!
//! This module provides the tokio-based dispatcher that submits claim requests
//! concurrently against a shared ledger.
//!
//! # Thread Safety
//!
//! The dispatcher clones a `ClaimCoordinator` into every task; all clones
//! share one `Arc`-wrapped ledger whose rows are guarded by DashMap shard
//! locks:
//! - Claims on different rewards and different users proceed in parallel
//! - Claims sharing a reward or a user are serialized by the store

pub mod dispatcher;

pub use dispatcher::ClaimDispatcher;
