//! Claim coordination
//!
//! This module provides the `ClaimCoordinator`, the business-rule gate in front
//! of the ledger store. It runs the check-then-act sequence through the
//! store's atomic `apply_claim` and maps the store outcome to what callers see.
//!
//! Per claim attempt the lifecycle is:
//!
//! ```text
//! Requested → Validating (existence) → Evaluating (points, stock) → Committed | Rejected
//! ```
//!
//! Validation and evaluation both happen inside the store's critical section,
//! so no intermediate state is observable. Nothing is retried here: a rejected
//! or failed claim must be resubmitted by the caller as a new attempt.

use std::sync::Arc;

use crate::core::traits::Ledger;
use crate::types::{ClaimOutcome, ClaimRecord, ClaimRequest, LedgerError, RewardId, UserId};

/// Orchestrates claims against an injected ledger
///
/// Cheap to clone; clones share the same ledger.
#[derive(Debug)]
pub struct ClaimCoordinator<L: Ledger> {
    ledger: Arc<L>,
}

impl<L: Ledger> Clone for ClaimCoordinator<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<L: Ledger> ClaimCoordinator<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Claim a reward on behalf of a user
    ///
    /// # Returns
    ///
    /// * `Ok(ClaimRecord)` - The claim was committed; balance and stock are updated
    /// * `Err(LedgerError::RewardNotFound)` / `Err(LedgerError::UserNotFound)` - Unknown IDs
    /// * `Err(LedgerError::InsufficientPoints)` - Balance below the price, nothing mutated
    /// * `Err(LedgerError::OutOfStock)` - Finite stock exhausted, nothing mutated
    /// * `Err(LedgerError::AlreadyClaimed)` - Repeat claim under the once-per-user policy
    /// * `Err(LedgerError::StorageFailure)` - Forwarded from the store unchanged
    pub fn claim(&self, user: UserId, reward: RewardId) -> Result<ClaimRecord, LedgerError> {
        tracing::debug!(user, reward, "Claim requested");

        let result = self.ledger.apply_claim(user, reward);
        match &result {
            Ok(record) => tracing::info!(
                user,
                reward,
                claim_id = record.claim_id,
                points_spent = record.points_spent,
                "Claim committed"
            ),
            Err(error) if error.rejection().is_some() => {
                tracing::debug!(user, reward, %error, "Claim rejected")
            }
            Err(error) => tracing::warn!(user, reward, %error, "Claim failed"),
        }

        result
    }

    /// Submit a request and get its tagged outcome
    pub fn submit(&self, request: ClaimRequest) -> ClaimOutcome {
        ClaimOutcome::from(self.claim(request.user, request.reward))
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }
}
