//! Concurrent claim dispatch for async batch processing
//!
//! This module provides the `ClaimDispatcher`, which submits a batch of claim
//! requests as independent tokio tasks, the way a request-handling layer runs
//! one handler per inbound request.
//!
//! # Design
//!
//! Claims carry no per-user ordering guarantee:
//! concurrent requests race, and the ledger store resolves every conflict on a
//! shared reward or user inside its critical section. The dispatcher therefore
//! does not partition the batch; it only collects the outcomes and restores
//! request order for reporting.
//!
//! # Architecture
//!
//! ```text
//! ClaimDispatcher
//!     └── ClaimCoordinator<L>  (cloned into every task)
//!             └── Arc<L: Ledger>
//! ```

use crate::core::coordinator::ClaimCoordinator;
use crate::core::traits::Ledger;
use crate::types::{ClaimOutcome, ClaimRequest, LedgerError, ProcessedClaim};

/// Runs claim requests concurrently on the current tokio runtime
#[derive(Debug)]
pub struct ClaimDispatcher<L: Ledger + 'static> {
    coordinator: ClaimCoordinator<L>,
}

impl<L: Ledger + 'static> Clone for ClaimDispatcher<L> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
        }
    }
}

impl<L: Ledger + 'static> ClaimDispatcher<L> {
    pub fn new(coordinator: ClaimCoordinator<L>) -> Self {
        Self { coordinator }
    }

    /// Dispatch a batch of claim requests concurrently
    ///
    /// Spawns one task per request and waits for all of them.
    ///
    /// # Returns
    ///
    /// One `ProcessedClaim` per request, sorted by request ID. A request
    /// whose task panicked is logged and reported as a storage failure.
    pub async fn dispatch_batch(&self, batch: Vec<ClaimRequest>) -> Vec<ProcessedClaim> {
        let tasks: Vec<_> = batch
            .into_iter()
            .map(|request| {
                let coordinator = self.coordinator.clone();
                let task = tokio::spawn(async move { coordinator.submit(request) });
                (request, task)
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        for (request, task) in tasks {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(request = request.request, error = ?e, "Claim task panicked");
                    ClaimOutcome::Failed(LedgerError::storage_failure(
                        "dispatch_batch",
                        format!("claim task failed: {}", e),
                    ))
                }
            };
            results.push(ProcessedClaim { request, outcome });
        }

        results.sort_by_key(|processed| processed.request.request);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LedgerStore;
    use crate::types::{
        ClaimRecord, Points, Rejection, Reward, RewardId, Stock, UserBalance, UserId,
    };
    use std::sync::Arc;

    fn build_dispatcher(store: LedgerStore) -> (Arc<LedgerStore>, ClaimDispatcher<LedgerStore>) {
        let store = Arc::new(store);
        let coordinator = ClaimCoordinator::new(Arc::clone(&store));
        (store, ClaimDispatcher::new(coordinator))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_dispatch_batch_last_unit_goes_to_one_request() {
        let store = LedgerStore::new();
        store
            .create_reward(Reward::new(1, "Final ticket", 60, Stock::Limited(1)).unwrap())
            .unwrap();
        for user in 1..=20 {
            store
                .restore_balance(UserBalance::with_points(user, 100))
                .unwrap();
        }
        let (store, dispatcher) = build_dispatcher(store);

        let batch: Vec<ClaimRequest> = (1..=20)
            .map(|user| ClaimRequest {
                request: u64::from(user),
                user,
                reward: 1,
            })
            .collect();
        let results = dispatcher.dispatch_batch(batch).await;

        assert_eq!(results.len(), 20);
        let committed = results.iter().filter(|r| r.outcome.is_committed()).count();
        assert_eq!(committed, 1);
        let sold_out = ClaimOutcome::Rejected(Rejection::OutOfStock { reward: 1 });
        assert!(results
            .iter()
            .all(|r| r.outcome.is_committed() || r.outcome == sold_out));
        assert_eq!(store.claim_count(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_batch_preserves_request_order() {
        let store = LedgerStore::new();
        store
            .create_reward(Reward::new(1, "Sticker", 1, Stock::Unlimited).unwrap())
            .unwrap();
        store.restore_balance(UserBalance::with_points(1, 10)).unwrap();
        let (_store, dispatcher) = build_dispatcher(store);

        let batch = vec![
            ClaimRequest {
                request: 3,
                user: 1,
                reward: 1,
            },
            ClaimRequest {
                request: 1,
                user: 1,
                reward: 2,
            },
            ClaimRequest {
                request: 2,
                user: 9,
                reward: 1,
            },
        ];
        let results = dispatcher.dispatch_batch(batch).await;

        let order: Vec<u64> = results.iter().map(|r| r.request.request).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(results[0].outcome.status_code(), 404);
        assert_eq!(results[1].outcome.status_code(), 404);
        assert_eq!(results[2].outcome.status_code(), 200);
    }

    /// Ledger whose claims panic for one reward and fail normally otherwise
    struct PanickingLedger;

    impl Ledger for PanickingLedger {
        fn get_balance(&self, user: UserId) -> Result<Points, LedgerError> {
            Err(LedgerError::user_not_found(user))
        }

        fn get_reward(&self, reward: RewardId) -> Result<Reward, LedgerError> {
            Err(LedgerError::reward_not_found(reward))
        }

        fn apply_claim(&self, _user: UserId, reward: RewardId) -> Result<ClaimRecord, LedgerError> {
            if reward == 13 {
                panic!("corrupted row for reward {}", reward);
            }
            Err(LedgerError::reward_not_found(reward))
        }

        fn rewards(&self) -> Vec<Reward> {
            Vec::new()
        }

        fn balances(&self) -> Vec<UserBalance> {
            Vec::new()
        }

        fn claims(&self) -> Vec<ClaimRecord> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_dispatch_batch_reports_panicked_task() {
        let dispatcher = ClaimDispatcher::new(ClaimCoordinator::new(Arc::new(PanickingLedger)));
        let batch = vec![
            ClaimRequest {
                request: 1,
                user: 1,
                reward: 13,
            },
            ClaimRequest {
                request: 2,
                user: 1,
                reward: 5,
            },
        ];

        let results = dispatcher.dispatch_batch(batch).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].request.request, 1);
        assert_eq!(results[0].outcome.status_code(), 500);
        assert!(matches!(
            &results[0].outcome,
            ClaimOutcome::Failed(error) if error.is_storage_failure()
        ));
        assert_eq!(results[1].outcome.status_code(), 404);
    }

    #[tokio::test]
    async fn test_dispatch_empty_batch() {
        let (_store, dispatcher) = build_dispatcher(LedgerStore::new());
        assert!(dispatcher.dispatch_batch(Vec::new()).await.is_empty());
    }
}
