//! User balance types for the rewards ledger
//!
//! This module defines the UserBalance structure holding a user's
//! redeemable points.

use serde::{Deserialize, Serialize};

/// User identifier
pub type UserId = u32;

/// Point amounts (balances and reward prices)
///
/// Unsigned so that a balance can never be represented as negative.
pub type Points = u64;

/// A user's point balance
///
/// One row per user. The balance is only ever lowered by a committed claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    /// The user this balance belongs to
    pub user: UserId,

    /// Points currently available for claims
    pub points: Points,
}

impl UserBalance {
    /// Create a balance for a freshly registered user (zero points)
    pub fn new(user: UserId) -> Self {
        UserBalance { user, points: 0 }
    }

    /// Create a balance carrying an existing point total
    ///
    /// Used when restoring persisted state into a store.
    pub fn with_points(user: UserId, points: Points) -> Self {
        UserBalance { user, points }
    }
}
