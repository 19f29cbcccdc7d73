//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over claim requests from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding Result<ClaimRequest, String>
//! for each CSV row:
//!
//! ```no_run
//! use rewards_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("claims.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(request) => println!("Claim request: {:?}", request),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::{convert_claim_record, CsvClaimRecord};
use crate::types::ClaimRequest;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Open a CSV file with the reader settings shared by all inputs
///
/// Whitespace is trimmed from every field and rows may have a varying
/// number of fields (optional trailing columns).
pub fn open_csv(path: &Path) -> Result<csv::Reader<File>, String> {
    let file =
        File::open(path).map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

    Ok(ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .buffer_capacity(8 * 1024)
        .from_reader(file))
}

/// Synchronous claim request reader
///
/// Streams one record at a time with constant memory usage.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(String)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        Ok(Self {
            reader: open_csv(path)?,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<ClaimRequest, String>;

    /// Get the next claim request from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(ClaimRequest))` - Successfully parsed record
    /// * `Some(Err(String))` - Parse error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvClaimRecord>();
        let next = deserializer.next()?;
        self.line_num += 1;

        // Line numbers count the header as line 1
        Some(match next {
            Ok(record) => Ok(convert_claim_record(record)),
            Err(e) => Err(format!(
                "Line {}: CSV parse error: {}",
                self.line_num + 1,
                e
            )),
        })
    }
}
