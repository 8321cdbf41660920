//! Asynchronous movement reader
//!
//! Reads movement rows from any `futures` `AsyncRead` source in batches, for
//! the concurrent replay strategy. Rows that fail to parse are logged and
//! skipped; they never end up in a batch.

use crate::io::csv_format::{convert_movement_record, MovementRecord};
use crate::types::{LedgerError, MovementRequest};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    rejected: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
            rejected: 0,
        }
    }

    /// Read up to `batch_size` valid requests
    ///
    /// An empty batch means the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<MovementRequest> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<MovementRecord>();

        while batch.len() < batch_size {
            let Some(row) = records.next().await else {
                break;
            };
            self.line_num += 1;

            let converted = row
                .map_err(|e| LedgerError::parse_error(None, e.to_string()))
                .and_then(convert_movement_record);
            match converted {
                Ok(request) => batch.push(request),
                Err(e) => {
                    self.rejected += 1;
                    warn!(line = self.line_num, error = %e, "skipping movement row");
                }
            }
        }

        batch
    }

    /// Rows skipped so far because they could not be parsed
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
