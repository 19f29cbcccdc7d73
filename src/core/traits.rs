//! Core trait for ledger storage
//!
//! This module defines the seam between the ledger store and the components
//! built on top of it (claim coordinator, query façade), so that either can be
//! handed any store implementation at construction time.

use crate::types::{ClaimRecord, LedgerError, Points, Reward, RewardId, UserBalance, UserId};

/// Storage of balances, reward stock and claim records
///
/// Implementations must be safe to share across threads. `apply_claim` is the
/// only mutating operation reachable from claim processing and must be atomic:
/// on any error, no balance, stock or claim change may be observable.
pub trait Ledger: Send + Sync {
    /// Current point balance of a user
    fn get_balance(&self, user: UserId) -> Result<Points, LedgerError>;

    /// Current state of a reward
    fn get_reward(&self, reward: RewardId) -> Result<Reward, LedgerError>;

    /// Check and apply a claim as one atomic unit
    fn apply_claim(&self, user: UserId, reward: RewardId) -> Result<ClaimRecord, LedgerError>;

    /// Snapshot of all rewards, in no particular order
    fn rewards(&self) -> Vec<Reward>;

    /// Snapshot of all balances, in no particular order
    fn balances(&self) -> Vec<UserBalance>;

    /// Snapshot of all claim records, in no particular order
    fn claims(&self) -> Vec<ClaimRecord>;
}
