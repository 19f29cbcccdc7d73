//! Thread-safe ledger storage
//!
//! This module provides the `LedgerStore`, the sole owner of user balances,
//! reward stock and claim records, and the only place they are mutated.
//!
//! # Design
//!
//! Each table is a `DashMap`, so rows are protected by fine-grained shard
//! locks rather than one global lock. A claim holds the reward row and the
//! user row at the same time for its whole check-and-mutate step, which makes
//! conflicting claims on the same reward or the same user run one after the
//! other while unrelated claims proceed in parallel.
//!
//! Locks are taken with `try_get_mut` and retried until the configured lock
//! timeout. A contended claim therefore never blocks indefinitely and two
//! claims can never deadlock on each other: a claim that cannot get both rows
//! releases what it holds before retrying.
//!
//! # Atomicity
//!
//! Every check runs, and every new value is computed, before the first write.
//! The writes themselves cannot fail, so a claim is either fully applied or
//! not applied at all.

use crate::core::traits::Ledger;
use crate::types::{
    ClaimId, ClaimRecord, LedgerError, Points, Reward, RewardId, UserBalance, UserId,
};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::try_result::TryResult;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Whether a user may claim the same reward more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimPolicy {
    /// Repeat claims are allowed as long as points and stock suffice
    #[default]
    Unrestricted,

    /// At most one committed claim per (user, reward) pair
    OncePerUser,
}

/// Configuration for a ledger store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// How long a claim may wait for the reward and user rows
    pub lock_timeout: Duration,

    /// Repeat-claim policy
    pub claim_policy: ClaimPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_millis(500),
            claim_policy: ClaimPolicy::Unrestricted,
        }
    }
}

impl LedgerConfig {
    pub fn new(lock_timeout: Duration, claim_policy: ClaimPolicy) -> Self {
        Self {
            lock_timeout,
            claim_policy,
        }
    }
}

/// In-memory ledger of balances, rewards and claims
#[derive(Debug)]
pub struct LedgerStore {
    /// Point balances by user
    balances: DashMap<UserId, UserBalance>,

    /// Rewards (including stock counters) by reward ID
    rewards: DashMap<RewardId, Reward>,

    /// Append-only claim records by claim ID
    claims: DashMap<ClaimId, ClaimRecord>,

    /// Claim ID for each (user, reward) pair, kept under `OncePerUser` only
    claimed_pairs: DashMap<(UserId, RewardId), ClaimId>,

    /// Next claim ID to hand out, only advanced on commit
    next_claim_id: AtomicU64,

    config: LedgerConfig,
}

impl LedgerStore {
    /// Create an empty store with the default configuration
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create an empty store with a custom configuration
    pub fn with_config(config: LedgerConfig) -> Self {
        Self {
            balances: DashMap::new(),
            rewards: DashMap::new(),
            claims: DashMap::new(),
            claimed_pairs: DashMap::new(),
            next_claim_id: AtomicU64::new(1),
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Create the balance row for a newly registered user (zero points)
    ///
    /// # Returns
    ///
    /// * `Ok(UserBalance)` - The created balance
    /// * `Err(LedgerError::DuplicateUser)` - If the user already has a balance
    pub fn register_user(&self, user: UserId) -> Result<UserBalance, LedgerError> {
        self.restore_balance(UserBalance::new(user))
    }

    /// Load a persisted balance row into the store
    ///
    /// # Returns
    ///
    /// * `Ok(UserBalance)` - The stored balance
    /// * `Err(LedgerError::DuplicateUser)` - If the user already has a balance
    pub fn restore_balance(&self, balance: UserBalance) -> Result<UserBalance, LedgerError> {
        match self.balances.entry(balance.user) {
            Entry::Occupied(_) => Err(LedgerError::duplicate_user(balance.user)),
            Entry::Vacant(slot) => {
                slot.insert(balance.clone());
                Ok(balance)
            }
        }
    }

    /// Add a reward to the catalogue
    ///
    /// # Returns
    ///
    /// * `Ok(Reward)` - The stored reward
    /// * `Err(LedgerError::InvalidReward)` - If the reward costs zero points
    /// * `Err(LedgerError::DuplicateReward)` - If the reward ID is taken
    pub fn create_reward(&self, reward: Reward) -> Result<Reward, LedgerError> {
        if reward.points_required == 0 {
            return Err(LedgerError::invalid_reward(
                reward.id,
                "points required must be a positive number",
            ));
        }

        match self.rewards.entry(reward.id) {
            Entry::Occupied(_) => Err(LedgerError::duplicate_reward(reward.id)),
            Entry::Vacant(slot) => {
                slot.insert(reward.clone());
                Ok(reward)
            }
        }
    }

    /// Number of committed claims
    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }

    /// Run `f` while holding both the reward row and the user row
    ///
    /// The reward is looked up first, so an unknown reward is reported before
    /// an unknown user. Fails with `StorageFailure` once the lock timeout
    /// elapses without getting both rows.
    fn with_locked_pair<T, F>(&self, user: UserId, reward: RewardId, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Reward, &mut UserBalance) -> Result<T, LedgerError>,
    {
        let deadline = Instant::now() + self.config.lock_timeout;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            match self.rewards.try_get_mut(&reward) {
                TryResult::Absent => return Err(LedgerError::reward_not_found(reward)),
                TryResult::Present(mut reward_row) => match self.balances.try_get_mut(&user) {
                    TryResult::Absent => return Err(LedgerError::user_not_found(user)),
                    TryResult::Present(mut balance) => {
                        return f(reward_row.value_mut(), balance.value_mut());
                    }
                    // Drop the reward row before retrying
                    TryResult::Locked => {}
                },
                TryResult::Locked => {}
            }

            if Instant::now() >= deadline {
                tracing::warn!(user, reward, attempts, "Timed out waiting for ledger rows");
                return Err(LedgerError::storage_failure(
                    "apply_claim",
                    format!(
                        "lock timeout after {}ms",
                        self.config.lock_timeout.as_millis()
                    ),
                ));
            }

            std::thread::yield_now();
        }
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for LedgerStore {
    fn get_balance(&self, user: UserId) -> Result<Points, LedgerError> {
        self.balances
            .get(&user)
            .map(|entry| entry.points)
            .ok_or_else(|| LedgerError::user_not_found(user))
    }

    fn get_reward(&self, reward: RewardId) -> Result<Reward, LedgerError> {
        self.rewards
            .get(&reward)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| LedgerError::reward_not_found(reward))
    }

    /// Check and apply a claim as one atomic unit
    ///
    /// Inside the critical section, in order:
    /// 1. Rejects a repeat claim when the once-per-user policy is active
    /// 2. Rejects when the balance is below the reward price
    /// 3. Rejects when finite stock is exhausted
    /// 4. Debits points, takes one unit of finite stock, records the claim
    fn apply_claim(&self, user: UserId, reward: RewardId) -> Result<ClaimRecord, LedgerError> {
        self.with_locked_pair(user, reward, |reward_row, balance| {
            if self.config.claim_policy == ClaimPolicy::OncePerUser
                && self.claimed_pairs.contains_key(&(user, reward))
            {
                return Err(LedgerError::already_claimed(user, reward));
            }

            let price = reward_row.points_required;
            let remaining_points = balance
                .points
                .checked_sub(price)
                .ok_or_else(|| LedgerError::insufficient_points(user, balance.points, price))?;

            let remaining_stock = reward_row
                .stock
                .take_one()
                .ok_or_else(|| LedgerError::out_of_stock(reward))?;

            let record = ClaimRecord {
                claim_id: self.next_claim_id.fetch_add(1, Ordering::SeqCst),
                user,
                reward,
                points_spent: price,
                claimed_at: Utc::now(),
            };

            balance.points = remaining_points;
            reward_row.stock = remaining_stock;
            self.claims.insert(record.claim_id, record.clone());
            if self.config.claim_policy == ClaimPolicy::OncePerUser {
                self.claimed_pairs.insert((user, reward), record.claim_id);
            }

            Ok(record)
        })
    }

    fn rewards(&self) -> Vec<Reward> {
        self.rewards
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn balances(&self) -> Vec<UserBalance> {
        self.balances
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn claims(&self) -> Vec<ClaimRecord> {
        self.claims
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
