//! Claim-related types for the rewards ledger
//!
//! This module defines claim requests as they arrive from callers, the
//! append-only claim records written by the store, and the tagged outcome
//! returned to the request-handling layer.

use super::balance::{Points, UserId};
use super::error::LedgerError;
use super::reward::RewardId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claim record identifier, assigned sequentially in commit order
pub type ClaimId = u64;

/// Caller-side request identifier (one per inbound request)
pub type RequestId = u64;

/// A single inbound claim attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimRequest {
    /// Identifier of the inbound request, used to order results
    pub request: RequestId,

    /// The authenticated user making the claim
    pub user: UserId,

    /// The reward being claimed
    pub reward: RewardId,
}

/// Audit record of a committed claim
///
/// Created exactly once per successful claim and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Sequential claim identifier
    pub claim_id: ClaimId,

    /// User whose points were debited
    pub user: UserId,

    /// Reward whose stock was debited
    pub reward: RewardId,

    /// Points deducted by this claim
    pub points_spent: Points,

    /// Commit time
    pub claimed_at: DateTime<Utc>,
}

/// Reason a claim was turned down without touching the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    RewardNotFound { reward: RewardId },
    UserNotFound { user: UserId },
    InsufficientPoints { available: Points, required: Points },
    OutOfStock { reward: RewardId },
    AlreadyClaimed { reward: RewardId },
}

impl Rejection {
    /// HTTP status the request layer answers with
    pub fn status_code(&self) -> u16 {
        match self {
            Rejection::RewardNotFound { .. } | Rejection::UserNotFound { .. } => 404,
            Rejection::InsufficientPoints { .. }
            | Rejection::OutOfStock { .. }
            | Rejection::AlreadyClaimed { .. } => 400,
        }
    }

    /// Caller-visible error message
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::RewardNotFound { .. } => "Reward not found",
            Rejection::UserNotFound { .. } => "User not found",
            Rejection::InsufficientPoints { .. } => "Insufficient points",
            Rejection::OutOfStock { .. } => "Reward out of stock",
            Rejection::AlreadyClaimed { .. } => "Reward already claimed",
        }
    }
}

/// Terminal state of one claim attempt
///
/// `Committed` means the debit is durable, `Rejected` and `Failed` both mean
/// nothing was mutated. Only `Failed` is worth retrying as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    Committed(ClaimRecord),
    Rejected(Rejection),
    Failed(LedgerError),
}

impl ClaimOutcome {
    /// HTTP status the request layer answers with
    pub fn status_code(&self) -> u16 {
        match self {
            ClaimOutcome::Committed(_) => 200,
            ClaimOutcome::Rejected(rejection) => rejection.status_code(),
            ClaimOutcome::Failed(_) => 500,
        }
    }

    /// Error message for the response body, `None` on success
    pub fn error_message(&self) -> Option<String> {
        match self {
            ClaimOutcome::Committed(_) => None,
            ClaimOutcome::Rejected(rejection) => Some(rejection.message().to_string()),
            ClaimOutcome::Failed(error) => Some(error.to_string()),
        }
    }

    /// The committed claim record, if any
    pub fn record(&self) -> Option<&ClaimRecord> {
        match self {
            ClaimOutcome::Committed(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, ClaimOutcome::Committed(_))
    }
}

impl From<Result<ClaimRecord, LedgerError>> for ClaimOutcome {
    fn from(result: Result<ClaimRecord, LedgerError>) -> Self {
        match result {
            Ok(record) => ClaimOutcome::Committed(record),
            Err(error) => match error.rejection() {
                Some(rejection) => ClaimOutcome::Rejected(rejection),
                None => ClaimOutcome::Failed(error),
            },
        }
    }
}

/// A claim request paired with its outcome
#[derive(Debug, Clone)]
pub struct ProcessedClaim {
    pub request: ClaimRequest,
    pub outcome: ClaimOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record() -> ClaimRecord {
        ClaimRecord {
            claim_id: 1,
            user: 7,
            reward: 3,
            points_spent: 80,
            claimed_at: Utc::now(),
        }
    }

    #[rstest]
    #[case::reward_not_found(LedgerError::reward_not_found(3), 404, "Reward not found")]
    #[case::user_not_found(LedgerError::user_not_found(7), 404, "User not found")]
    #[case::insufficient(LedgerError::insufficient_points(7, 50, 80), 400, "Insufficient points")]
    #[case::out_of_stock(LedgerError::out_of_stock(3), 400, "Reward out of stock")]
    #[case::already_claimed(LedgerError::already_claimed(7, 3), 400, "Reward already claimed")]
    fn test_rejections_map_to_client_errors(
        #[case] error: LedgerError,
        #[case] status: u16,
        #[case] message: &str,
    ) {
        let outcome = ClaimOutcome::from(Err(error));

        assert!(matches!(outcome, ClaimOutcome::Rejected(_)));
        assert_eq!(outcome.status_code(), status);
        assert_eq!(outcome.error_message().as_deref(), Some(message));
        assert!(outcome.record().is_none());
    }

    #[test]
    fn test_storage_failure_maps_to_failed() {
        let error = LedgerError::storage_failure("apply_claim", "lock timeout");
        let outcome = ClaimOutcome::from(Err(error.clone()));

        assert_eq!(outcome, ClaimOutcome::Failed(error));
        assert_eq!(outcome.status_code(), 500);
    }

    #[test]
    fn test_committed_outcome() {
        let outcome = ClaimOutcome::from(Ok(record()));

        assert!(outcome.is_committed());
        assert_eq!(outcome.status_code(), 200);
        assert_eq!(outcome.error_message(), None);
        assert_eq!(outcome.record().map(|r| r.points_spent), Some(80));
    }
}
