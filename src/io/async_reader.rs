//! Asynchronous CSV reader with batch interface
//!
//! Provides batched reading of claim requests from a CSV stream for the async
//! processing strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of ClaimRequests
//!                  ↓
//!           csv_format module
//!           (CsvClaimRecord, convert_claim_record)
//! ```

use crate::io::csv_format::{convert_claim_record, CsvClaimRecord};
use crate::types::ClaimRequest;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous claim request reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read a batch of claim requests
    ///
    /// Reads up to `batch_size` records. Malformed records are logged and
    /// skipped.
    ///
    /// # Returns
    ///
    /// The parsed requests; an empty vector once the end of input is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<ClaimRequest> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvClaimRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => batch.push(convert_claim_record(record)),
                Some(Err(e)) => tracing::warn!(error = %e, "Skipping malformed claim record"),
                None => break,
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;

    #[tokio::test]
    async fn test_async_reader_multiple_batches() {
        let csv_content = "request,user,reward\n1,1,1\n2,1,2\n3,2,1\n4,2,2\n5,3,1\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch1 = async_reader.read_batch(2).await;
        assert_eq!(batch1.len(), 2);
        assert_eq!(batch1[0].request, 1);
        assert_eq!(batch1[1].reward, 2);

        let batch2 = async_reader.read_batch(2).await;
        assert_eq!(batch2.len(), 2);
        assert_eq!(batch2[0].user, 2);

        let batch3 = async_reader.read_batch(2).await;
        assert_eq!(batch3.len(), 1);
        assert_eq!(batch3[0].request, 5);

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_record() {
        let csv_content = "request,user,reward\n1,abc,1\n2,1,1\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].request, 2);
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = AsyncReader::new(Cursor::new("request,user,reward\n".as_bytes()));
        assert!(async_reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_handling() {
        let csv_content = "request,user,reward\n  1 ,  4  , 9 \n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await;
        assert_eq!(
            batch,
            vec![ClaimRequest {
                request: 1,
                user: 4,
                reward: 9
            }]
        );
    }
}
