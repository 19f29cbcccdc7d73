//! CSV format handling for seed data, claim requests and results
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for deserialization (users, rewards, claim requests)
//! - Conversion from CSV records to domain types
//! - Serialization of claim outcomes and final ledger state
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{
    ClaimRequest, LedgerError, ProcessedClaim, Reward, RewardId, Stock, UserBalance, UserId,
};
use serde::Deserialize;
use std::io::Write;

/// Row of `users.csv`: `user,points`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvBalanceRecord {
    pub user: UserId,
    pub points: i64,
}

/// Row of `rewards.csv`: `reward,title,description,points_required,stock`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRewardRecord {
    pub reward: RewardId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub points_required: i64,
    pub stock: i64,
}

/// Row of a claims file: `request,user,reward`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvClaimRecord {
    pub request: u64,
    pub user: UserId,
    pub reward: RewardId,
}

/// Convert a users.csv row to a balance
///
/// Balances are never negative, so a negative point total is rejected.
pub fn convert_balance_record(record: CsvBalanceRecord) -> Result<UserBalance, String> {
    let points = u64::try_from(record.points).map_err(|_| {
        format!(
            "Invalid points '{}' for user {}: balances cannot be negative",
            record.points, record.user
        )
    })?;

    Ok(UserBalance::with_points(record.user, points))
}

/// Convert a rewards.csv row to a validated reward
///
/// Applies the administrative creation rules: a non-blank title, at least one
/// point required, and stock of -1 (unlimited) or more.
pub fn convert_reward_record(record: CsvRewardRecord) -> Result<Reward, String> {
    let points_required = u64::try_from(record.points_required).map_err(|_| {
        format!(
            "Invalid points required '{}' for reward {}",
            record.points_required, record.reward
        )
    })?;

    let stock = Stock::from_raw(record.stock)
        .map_err(|e| format!("Invalid stock for reward {}: {}", record.reward, e))?;

    let reward = Reward::new(record.reward, record.title, points_required, stock)
        .map_err(|e: LedgerError| e.to_string())?;

    Ok(match record.description {
        Some(description) => reward.with_description(description),
        None => reward,
    })
}

/// Convert a claims file row to a claim request
pub fn convert_claim_record(record: CsvClaimRecord) -> ClaimRequest {
    ClaimRequest {
        request: record.request,
        user: record.user,
        reward: record.reward,
    }
}

/// Write claim outcomes to CSV format
///
/// Columns: `request,user,reward,status,claim,error`. `claim` is empty unless
/// the claim was committed, `error` is empty if it was. Rows are sorted by
/// request ID for deterministic output.
pub fn write_outcomes_csv(results: &[ProcessedClaim], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["request", "user", "reward", "status", "claim", "error"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted: Vec<&ProcessedClaim> = results.iter().collect();
    sorted.sort_by_key(|processed| processed.request.request);

    for processed in sorted {
        let claim = processed
            .outcome
            .record()
            .map(|record| record.claim_id.to_string())
            .unwrap_or_default();

        writer
            .write_record(&[
                processed.request.request.to_string(),
                processed.request.user.to_string(),
                processed.request.reward.to_string(),
                processed.outcome.status_code().to_string(),
                claim,
                processed.outcome.error_message().unwrap_or_default(),
            ])
            .map_err(|e| format!("Failed to write outcome record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write balances to CSV format (`user,points`), sorted by user ID
pub fn write_balances_csv(balances: &[UserBalance], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["user", "points"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted = balances.to_vec();
    sorted.sort_by_key(|balance| balance.user);

    for balance in sorted {
        writer
            .write_record(&[balance.user.to_string(), balance.points.to_string()])
            .map_err(|e| format!("Failed to write balance record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write reward stock to CSV format (`reward,stock`), sorted by reward ID
pub fn write_stock_csv(rewards: &[Reward], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["reward", "stock"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted: Vec<&Reward> = rewards.iter().collect();
    sorted.sort_by_key(|reward| reward.id);

    for reward in sorted {
        writer
            .write_record(&[reward.id.to_string(), reward.stock.to_string()])
            .map_err(|e| format!("Failed to write stock record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
