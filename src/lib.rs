//! Rewards Ledger Library
//! # Overview
//!
//! This library provides an in-memory reward ledger: users hold point
//! balances, rewards carry a point cost and a stock counter, and a claim
//! atomically spends points, consumes one unit of stock and records the
//! claim. Claim requests are replayed from CSV by a sequential or a
//! concurrent strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (UserBalance, Reward, ClaimRecord, LedgerError, etc.)
//! - [`cli`] - CLI arguments parsing and log setup
//! - [`core`] - Business logic components:
//!   - [`core::ledger_store`] - Balances, stock and claims; the only mutation surface
//!   - [`core::coordinator`] - Claim orchestration and outcome mapping
//!   - [`core::query`] - Read-only views for display
//! - [`io`] - CSV seed loading, claim readers and result writers
//! - [`strategy`] - Pluggable sync and async replay pipelines
//!
//! # Claim Outcomes
//!
//! Every claim request ends in exactly one outcome:
//!
//! - **200**: Committed; points deducted, stock decremented, claim recorded
//! - **404**: Reward not found or user not found
//! - **400**: Insufficient points, reward out of stock, or reward already claimed
//! - **500**: Storage failure; nothing was changed
//!
//! # Stock
//!
//! A stock of `-1` means unlimited and is never decremented. Any other stock
//! is a non-negative count that never drops below zero.

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{ClaimCoordinator, ClaimPolicy, Ledger, LedgerConfig, LedgerStore, QueryFacade};
pub use io::{load_seed_files, write_balances_csv, write_outcomes_csv, write_stock_csv};
pub use types::{
    ClaimId, ClaimOutcome, ClaimRecord, ClaimRequest, LedgerError, Points, Reward, RewardId,
    Stock, UserBalance, UserId,
};
