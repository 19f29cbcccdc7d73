//! Reward-related types for the rewards ledger
//!
//! This module defines rewards and their stock counters. Stock uses the
//! integer wire representation of the persisted schema, where -1 means
//! unlimited.

use super::balance::Points;
use super::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reward identifier
pub type RewardId = u32;

/// Remaining redeemable units of a reward
///
/// Serialized as a plain integer: `-1` for unlimited, otherwise the number of
/// remaining units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Stock {
    /// Never runs out; claims leave it unchanged
    Unlimited,

    /// A finite number of remaining units (0 means sold out)
    Limited(u32),
}

impl Stock {
    /// Wire value for unlimited stock
    pub const UNLIMITED: i64 = -1;

    /// Parse the integer representation used by the persisted schema
    ///
    /// # Returns
    ///
    /// * `Ok(Stock)` for `-1` or any value in `0..=u32::MAX`
    /// * `Err(String)` for anything else
    pub fn from_raw(raw: i64) -> Result<Self, String> {
        match raw {
            Self::UNLIMITED => Ok(Stock::Unlimited),
            n if n >= 0 => u32::try_from(n)
                .map(Stock::Limited)
                .map_err(|_| format!("stock {} is too large", n)),
            n => Err(format!("stock must be -1 (unlimited) or non-negative, got {}", n)),
        }
    }

    /// Integer representation used by the persisted schema
    pub fn as_raw(self) -> i64 {
        match self {
            Stock::Unlimited => Self::UNLIMITED,
            Stock::Limited(n) => i64::from(n),
        }
    }

    /// Stock after one unit is claimed
    ///
    /// Returns `None` when sold out. Unlimited stock stays unlimited.
    pub fn take_one(self) -> Option<Stock> {
        match self {
            Stock::Unlimited => Some(Stock::Unlimited),
            Stock::Limited(n) => n.checked_sub(1).map(Stock::Limited),
        }
    }
}

impl From<Stock> for i64 {
    fn from(stock: Stock) -> Self {
        stock.as_raw()
    }
}

impl TryFrom<i64> for Stock {
    type Error = String;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Stock::from_raw(raw)
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_raw())
    }
}

/// A redeemable reward
///
/// Created by an administrative action. After creation only `stock` changes,
/// and only through a committed claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Unique reward identifier
    pub id: RewardId,

    /// Display title
    pub title: String,

    /// Longer display text, may be empty
    pub description: String,

    /// Price of one unit in points (always positive)
    pub points_required: Points,

    /// Remaining units
    pub stock: Stock,
}

impl Reward {
    /// Create a validated reward
    ///
    /// # Arguments
    ///
    /// * `id` - The reward ID
    /// * `title` - Display title, must not be blank
    /// * `points_required` - Price per unit, must be at least 1
    /// * `stock` - Initial stock
    ///
    /// # Returns
    ///
    /// * `Ok(Reward)` with an empty description
    /// * `Err(LedgerError::InvalidReward)` if the title is blank or the price is zero
    pub fn new(
        id: RewardId,
        title: impl Into<String>,
        points_required: Points,
        stock: Stock,
    ) -> Result<Self, LedgerError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LedgerError::invalid_reward(id, "title is required"));
        }
        if points_required == 0 {
            return Err(LedgerError::invalid_reward(
                id,
                "points required must be a positive number",
            ));
        }

        Ok(Reward {
            id,
            title,
            description: String::new(),
            points_required,
            stock,
        })
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
