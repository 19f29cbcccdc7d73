//! Read-only ledger queries
//!
//! The `QueryFacade` serves side-effect-free reads used to render reward
//! lists and balances before a claim is attempted. Reads run concurrently with
//! claims and may be slightly stale; claim decisions never rely on them.

use std::sync::Arc;

use crate::core::traits::Ledger;
use crate::types::{ClaimRecord, LedgerError, Points, Reward, RewardId, UserId};

/// Read-only view over an injected ledger
#[derive(Debug)]
pub struct QueryFacade<L: Ledger> {
    ledger: Arc<L>,
}

impl<L: Ledger> Clone for QueryFacade<L> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<L: Ledger> QueryFacade<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// All rewards, cheapest first (ties broken by reward ID)
    pub fn list_rewards(&self) -> Vec<Reward> {
        let mut rewards = self.ledger.rewards();
        rewards.sort_by_key(|reward| (reward.points_required, reward.id));
        rewards
    }

    pub fn get_balance(&self, user: UserId) -> Result<Points, LedgerError> {
        self.ledger.get_balance(user)
    }

    pub fn get_reward(&self, reward: RewardId) -> Result<Reward, LedgerError> {
        self.ledger.get_reward(reward)
    }

    /// Claim history of a user, oldest first
    pub fn claims_for_user(&self, user: UserId) -> Vec<ClaimRecord> {
        self.claims_matching(|claim| claim.user == user)
    }

    /// Claim history of a reward, oldest first
    pub fn claims_for_reward(&self, reward: RewardId) -> Vec<ClaimRecord> {
        self.claims_matching(|claim| claim.reward == reward)
    }

    fn claims_matching(&self, predicate: impl Fn(&ClaimRecord) -> bool) -> Vec<ClaimRecord> {
        let mut claims: Vec<ClaimRecord> = self
            .ledger
            .claims()
            .into_iter()
            .filter(|claim| predicate(claim))
            .collect();
        claims.sort_by_key(|claim| claim.claim_id);
        claims
    }
}
