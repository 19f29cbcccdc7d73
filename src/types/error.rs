//! Error types for the rewards ledger
//!
//! This module defines all error types that can occur while seeding the
//! ledger and processing claims.
//!
//! # Error Categories
//!
//! - **Not found**: unknown user or reward (caller error, 404)
//! - **Rejections**: insufficient points, out of stock, already claimed (400)
//! - **Storage failures**: the store could not complete the transaction (500,
//!   safe to retry because nothing was mutated)
//! - **Setup errors**: invalid or duplicate seed data, file I/O and CSV parsing

use super::balance::{Points, UserId};
use super::claim::Rejection;
use super::reward::RewardId;
use thiserror::Error;

/// Main error type for the rewards ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No balance row exists for the user
    #[error("User {user} not found")]
    UserNotFound { user: UserId },

    /// No reward exists with this ID
    #[error("Reward {reward} not found")]
    RewardNotFound { reward: RewardId },

    /// The user's balance is lower than the reward price
    ///
    /// Nothing is mutated; retrying without a new balance yields the same result.
    #[error("Insufficient points for user {user}: available {available}, required {required}")]
    InsufficientPoints {
        user: UserId,
        available: Points,
        required: Points,
    },

    /// The reward's finite stock is exhausted
    #[error("Reward {reward} is out of stock")]
    OutOfStock { reward: RewardId },

    /// The once-per-user policy is active and this pair already has a claim
    #[error("User {user} has already claimed reward {reward}")]
    AlreadyClaimed { user: UserId, reward: RewardId },

    /// The store could not complete the operation
    ///
    /// No partial mutation is left behind, so the caller may retry.
    #[error("Storage failure during {operation}: {message}")]
    StorageFailure { operation: String, message: String },

    /// Reward data failed validation
    #[error("Invalid reward {reward}: {message}")]
    InvalidReward { reward: RewardId, message: String },

    /// A balance row for this user already exists
    #[error("Duplicate user {user}")]
    DuplicateUser { user: UserId },

    /// A reward with this ID already exists
    #[error("Duplicate reward {reward}")]
    DuplicateReward { reward: RewardId },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError { line: Option<u64>, message: String },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    pub fn user_not_found(user: UserId) -> Self {
        LedgerError::UserNotFound { user }
    }

    pub fn reward_not_found(reward: RewardId) -> Self {
        LedgerError::RewardNotFound { reward }
    }

    pub fn insufficient_points(user: UserId, available: Points, required: Points) -> Self {
        LedgerError::InsufficientPoints {
            user,
            available,
            required,
        }
    }

    pub fn out_of_stock(reward: RewardId) -> Self {
        LedgerError::OutOfStock { reward }
    }

    pub fn already_claimed(user: UserId, reward: RewardId) -> Self {
        LedgerError::AlreadyClaimed { user, reward }
    }

    pub fn storage_failure(operation: &str, message: impl Into<String>) -> Self {
        LedgerError::StorageFailure {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_reward(reward: RewardId, message: impl Into<String>) -> Self {
        LedgerError::InvalidReward {
            reward,
            message: message.into(),
        }
    }

    pub fn duplicate_user(user: UserId) -> Self {
        LedgerError::DuplicateUser { user }
    }

    pub fn duplicate_reward(reward: RewardId) -> Self {
        LedgerError::DuplicateReward { reward }
    }

    /// The caller-facing rejection this error represents, if it is one
    ///
    /// Storage and setup errors are not rejections and return `None`.
    pub fn rejection(&self) -> Option<Rejection> {
        match *self {
            LedgerError::RewardNotFound { reward } => Some(Rejection::RewardNotFound { reward }),
            LedgerError::UserNotFound { user } => Some(Rejection::UserNotFound { user }),
            LedgerError::InsufficientPoints {
                available,
                required,
                ..
            } => Some(Rejection::InsufficientPoints {
                available,
                required,
            }),
            LedgerError::OutOfStock { reward } => Some(Rejection::OutOfStock { reward }),
            LedgerError::AlreadyClaimed { reward, .. } => {
                Some(Rejection::AlreadyClaimed { reward })
            }
            _ => None,
        }
    }

    /// Whether this error is a storage failure (safe to retry)
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, LedgerError::StorageFailure { .. })
    }
}
