//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `balance`: User point balances
//! - `reward`: Rewards and stock counters
//! - `claim`: Claim requests, records and outcomes
//! - `error`: Error types for the rewards ledger

pub mod balance;
pub mod claim;
pub mod error;
pub mod reward;

pub use balance::{Points, UserBalance, UserId};
pub use claim::{
    ClaimId, ClaimOutcome, ClaimRecord, ClaimRequest, ProcessedClaim, Rejection, RequestId,
};
pub use error::LedgerError;
pub use reward::{Reward, RewardId, Stock};
