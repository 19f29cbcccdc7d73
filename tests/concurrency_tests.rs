//! Concurrency integration tests
//!
//! Exercise the public API from many threads at once and check the ledger
//! invariants afterwards:
//! - Points spent by committed claims equal the drop in total balance
//! - Finite stock never goes below zero and drops by exactly one per claim
//! - Competing claims on a last unit have exactly one winner

use rewards_ledger::core::r#async::ClaimDispatcher;
use rewards_ledger::core::{ClaimCoordinator, Ledger, LedgerStore, QueryFacade};
use rewards_ledger::types::{ClaimOutcome, ClaimRequest, Reward, Stock, UserBalance};
use rstest::rstest;
use std::sync::{Arc, Barrier};
use std::thread;

fn seeded_store(users: u32, points: u64, rewards: &[(u32, u64, Stock)]) -> Arc<LedgerStore> {
    let store = LedgerStore::new();
    for user in 1..=users {
        store
            .restore_balance(UserBalance::with_points(user, points))
            .unwrap();
    }
    for &(id, price, stock) in rewards {
        store
            .create_reward(Reward::new(id, format!("Reward {}", id), price, stock).unwrap())
            .unwrap();
    }
    Arc::new(store)
}

fn total_points(store: &LedgerStore) -> u64 {
    store.balances().iter().map(|balance| balance.points).sum()
}

#[rstest]
#[case::two_claimers(2)]
#[case::many_claimers(16)]
fn test_single_unit_has_one_winner(#[case] claimers: u32) {
    let store = seeded_store(claimers, 100, &[(1, 100, Stock::Limited(1))]);
    let coordinator = ClaimCoordinator::new(Arc::clone(&store));
    let barrier = Arc::new(Barrier::new(claimers as usize));

    let handles: Vec<_> = (1..=claimers)
        .map(|user| {
            let coordinator = coordinator.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                coordinator.claim(user, 1)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("claim thread panicked"))
        .collect();

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.to_string().contains("out of stock")));

    assert_eq!(store.get_reward(1).unwrap().stock, Stock::Limited(0));
    assert_eq!(store.get_balance(winners[0].user), Ok(0));
    assert_eq!(total_points(&store), (claimers as u64 - 1) * 100);
}

#[test]
fn test_points_are_conserved_under_contention() {
    // 8 users, each able to afford 3 of the cheap rewards, all hammering two rewards
    let store = seeded_store(
        8,
        90,
        &[(1, 30, Stock::Limited(10)), (2, 30, Stock::Unlimited)],
    );
    let before = total_points(&store);
    let coordinator = ClaimCoordinator::new(Arc::clone(&store));

    let handles: Vec<_> = (1..=8u32)
        .map(|user| {
            let coordinator = coordinator.clone();
            thread::spawn(move || {
                (0..6)
                    .map(|i| coordinator.claim(user, 1 + i % 2))
                    .filter(Result::is_ok)
                    .count()
            })
        })
        .collect();

    let committed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    let claims = store.claims();
    assert_eq!(claims.len(), committed);
    let spent: u64 = claims.iter().map(|claim| claim.points_spent).sum();
    assert_eq!(before - total_points(&store), spent);

    // Each user can afford exactly three claims, whatever the interleaving
    assert_eq!(committed, 24);
    assert!(store.balances().iter().all(|balance| balance.points == 0));

    let limited = store.get_reward(1).unwrap();
    let claimed_limited = claims.iter().filter(|claim| claim.reward == 1).count() as u32;
    assert_eq!(limited.stock, Stock::Limited(10 - claimed_limited));
    assert_eq!(store.get_reward(2).unwrap().stock, Stock::Unlimited);
}

#[test]
fn test_claim_ids_unique_and_dense() {
    let store = seeded_store(20, 1_000, &[(1, 1, Stock::Unlimited)]);
    let coordinator = ClaimCoordinator::new(Arc::clone(&store));

    let handles: Vec<_> = (1..=20u32)
        .map(|user| {
            let coordinator = coordinator.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    coordinator.claim(user, 1).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let query = QueryFacade::new(Arc::clone(&store));
    let mut ids: Vec<u64> = store.claims().iter().map(|claim| claim.claim_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=200).collect::<Vec<_>>());
    assert_eq!(query.claims_for_reward(1).len(), 200);
    assert_eq!(query.claims_for_user(7).len(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dispatcher_respects_stock_under_races() {
    let store = seeded_store(
        50,
        100,
        &[(1, 10, Stock::Limited(5)), (2, 10, Stock::Limited(0))],
    );
    let dispatcher = ClaimDispatcher::new(ClaimCoordinator::new(Arc::clone(&store)));

    let batch: Vec<ClaimRequest> = (1..=100u64)
        .map(|request| ClaimRequest {
            request,
            user: ((request - 1) % 50) as u32 + 1,
            reward: if request % 10 == 0 { 2 } else { 1 },
        })
        .collect();

    let results = dispatcher.dispatch_batch(batch).await;

    assert_eq!(results.len(), 100);
    let committed = results
        .iter()
        .filter(|processed| matches!(processed.outcome, ClaimOutcome::Committed(_)))
        .count();
    assert_eq!(committed, 5);
    assert!(results
        .iter()
        .filter(|processed| processed.request.reward == 2)
        .all(|processed| processed.outcome.status_code() == 400));
    assert_eq!(store.get_reward(1).unwrap().stock, Stock::Limited(0));
    assert_eq!(total_points(&store), 50 * 100 - 5 * 10);
}
