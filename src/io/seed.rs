//! Loading persisted ledger state
//!
//! Reads `users.csv` and `rewards.csv` snapshots into a `LedgerStore`. Unlike
//! claim requests, seed rows are not skipped when malformed: a broken snapshot
//! aborts loading, since claims against partially loaded state would be wrong.

use crate::core::LedgerStore;
use crate::io::csv_format::{
    convert_balance_record, convert_reward_record, CsvBalanceRecord, CsvRewardRecord,
};
use crate::types::LedgerError;
use csv::{Position, ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Summary of a completed seed load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub users: usize,
    pub rewards: usize,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input)
}

/// Deserialize every row and hand it to `apply` with the line it starts on
///
/// Lines come from the reader's record position, so quoted fields that span
/// several lines still report where their row begins.
fn for_each_row<R, T, F>(input: R, mut apply: F) -> Result<usize, LedgerError>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut(Option<u64>, T) -> Result<(), LedgerError>,
{
    let mut rows = reader(input);
    let headers = rows.headers()?.clone();
    let mut record = StringRecord::new();
    let mut loaded = 0;

    while rows.read_record(&mut record)? {
        let line = record.position().map(Position::line);
        let row = record
            .deserialize(Some(&headers))
            .map_err(|e| LedgerError::ParseError {
                line,
                message: e.to_string(),
            })?;
        apply(line, row)?;
        loaded += 1;
    }

    Ok(loaded)
}

/// Load user balances into the store
///
/// # Returns
///
/// * `Ok(usize)` - Number of balances loaded
/// * `Err(LedgerError::ParseError)` - Malformed row (with line number)
/// * `Err(LedgerError::DuplicateUser)` - The user already has a balance
pub fn load_balances<R: Read>(store: &LedgerStore, input: R) -> Result<usize, LedgerError> {
    let loaded = for_each_row(input, |line, row: CsvBalanceRecord| {
        let balance = convert_balance_record(row)
            .map_err(|message| LedgerError::ParseError { line, message })?;
        store.restore_balance(balance).map(|_| ())
    })?;

    tracing::info!(count = loaded, "Loaded user balances");
    Ok(loaded)
}

/// Load rewards into the store
///
/// # Returns
///
/// * `Ok(usize)` - Number of rewards loaded
/// * `Err(LedgerError::ParseError)` - Malformed or invalid row (with line number)
/// * `Err(LedgerError::DuplicateReward)` - The reward ID is taken
pub fn load_rewards<R: Read>(store: &LedgerStore, input: R) -> Result<usize, LedgerError> {
    let loaded = for_each_row(input, |line, row: CsvRewardRecord| {
        let reward = convert_reward_record(row)
            .map_err(|message| LedgerError::ParseError { line, message })?;
        store.create_reward(reward).map(|_| ())
    })?;

    tracing::info!(count = loaded, "Loaded rewards");
    Ok(loaded)
}

/// Load both snapshot files from disk
pub fn load_seed_files(
    store: &LedgerStore,
    users_path: &Path,
    rewards_path: &Path,
) -> Result<SeedSummary, LedgerError> {
    let users = load_balances(store, File::open(users_path)?)?;
    let rewards = load_rewards(store, File::open(rewards_path)?)?;
    Ok(SeedSummary { users, rewards })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Ledger;
    use crate::types::Stock;

    #[test]
    fn test_load_balances() {
        let store = LedgerStore::new();
        let csv = "user,points\n1,100\n2,0\n";

        assert_eq!(load_balances(&store, csv.as_bytes()), Ok(2));
        assert_eq!(store.get_balance(1), Ok(100));
        assert_eq!(store.get_balance(2), Ok(0));
    }

    #[test]
    fn test_load_rewards_with_optional_description() {
        let store = LedgerStore::new();
        let csv = "reward,title,description,points_required,stock\n\
                   1,Jersey,Home kit,80,1\n\
                   2,Sticker,,5,-1\n";

        assert_eq!(load_rewards(&store, csv.as_bytes()), Ok(2));
        let jersey = store.get_reward(1).unwrap();
        assert_eq!(jersey.description, "Home kit");
        assert_eq!(jersey.stock, Stock::Limited(1));
        let sticker = store.get_reward(2).unwrap();
        assert_eq!(sticker.description, "");
        assert_eq!(sticker.stock, Stock::Unlimited);
    }

    #[test]
    fn test_invalid_row_reports_line() {
        let store = LedgerStore::new();
        let csv = "user,points\n1,100\n2,-4\n";

        let result = load_balances(&store, csv.as_bytes());

        assert!(matches!(
            result,
            Err(LedgerError::ParseError { line: Some(3), .. })
        ));
    }

    #[test]
    fn test_malformed_row_is_parse_error() {
        let store = LedgerStore::new();
        let csv = "reward,title,description,points_required,stock\n1,Jersey,,lots,1\n";

        assert!(matches!(
            load_rewards(&store, csv.as_bytes()),
            Err(LedgerError::ParseError { .. })
        ));
    }

    #[test]
    fn test_error_line_counts_multiline_descriptions() {
        let store = LedgerStore::new();
        let csv = "reward,title,description,points_required,stock\n\
                   1,Jersey,\"Home kit\nsize M\",80,1\n\
                   2,Cap,,0,1\n";

        let result = load_rewards(&store, csv.as_bytes());

        assert!(
            matches!(result, Err(LedgerError::ParseError { line: Some(4), .. })),
            "unexpected result: {:?}",
            result
        );
        assert_eq!(store.get_reward(1).unwrap().description, "Home kit\nsize M");
    }

    #[test]
    fn test_duplicate_user_aborts_load() {
        let store = LedgerStore::new();
        let csv = "user,points\n1,100\n1,50\n";

        assert_eq!(
            load_balances(&store, csv.as_bytes()),
            Err(LedgerError::duplicate_user(1))
        );
        assert_eq!(store.get_balance(1), Ok(100));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let store = LedgerStore::new();
        let result = load_seed_files(
            &store,
            Path::new("missing-users.csv"),
            Path::new("missing-rewards.csv"),
        );
        assert!(matches!(result, Err(LedgerError::IoError { .. })));
    }
}
