//! Asynchronous replay strategy
//!
//! Reads the movements file in batches with tokio and hands each batch to the
//! [`BatchProcessor`], which applies it with one task per account. Batches are
//! processed one after the other, so an account's movements keep their file
//! order across batch boundaries.
//!
//! # Configuration
//!
//! - **batch_size**: rows per batch (default: 1000)
//! - **max_concurrent_batches**: tokio worker threads (default: CPU count)

use crate::core::{BatchProcessor, Ledger};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{ProcessingStrategy, ReplaySummary};
use crate::types::LedgerError;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tuning for the async strategy
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Rows read per batch
    pub batch_size: usize,

    /// Worker threads applying a batch
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a config, replacing zero values with defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid concurrency, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create an async strategy with the given configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Batch size and worker thread count
    ///
    /// # Returns
    ///
    /// A new `AsyncProcessingStrategy` ready to replay a movements file
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn replay(
        &self,
        ledger: &Arc<Ledger>,
        movements_path: &Path,
    ) -> Result<ReplaySummary, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| LedgerError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let processor = BatchProcessor::new(Arc::clone(ledger));

            let file = tokio::fs::File::open(movements_path)
                .await
                .map_err(|e| LedgerError::IoError {
                    message: format!(
                        "Failed to open file '{}': {}",
                        movements_path.display(),
                        e
                    ),
                })?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut summary = ReplaySummary::default();
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for outcome in processor.process_batch(batch).await {
                    match outcome.result {
                        Ok(_) => summary.posted += 1,
                        Err(e) => {
                            summary.rejected += 1;
                            warn!(account = %outcome.request.account, error = %e, "movement rejected");
                        }
                    }
                }
            }
            summary.rejected += reader.rejected();

            debug!(
                posted = summary.posted,
                rejected = summary.rejected,
                "async replay finished"
            );
            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountDraft, AccountType, CustomerDraft, Gender, Person};
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn ledger(numbers: &[&str]) -> Arc<Ledger> {
        let ledger = Ledger::new();
        let customer = ledger
            .create_customer(CustomerDraft::new(Person {
                name: "Juan Osorio".to_string(),
                gender: Gender::Male,
                age: 51,
                identification: "1711".to_string(),
                address: "13 junio y Equinoccial".to_string(),
                phone: "098874587".to_string(),
            }))
            .unwrap();
        for number in numbers {
            ledger
                .create_account(AccountDraft::new(number, AccountType::Checking, customer.id))
                .unwrap();
        }
        Arc::new(ledger)
    }

    #[rstest]
    #[case::zero_batch(0, 4, 1000, 4)]
    #[case::zero_concurrency(50, 0, 50, num_cpus::get())]
    #[case::valid(50, 2, 50, 2)]
    fn test_batch_config_new(
        #[case] batch_size: usize,
        #[case] max_concurrent: usize,
        #[case] expected_batch: usize,
        #[case] expected_concurrent: usize,
    ) {
        let config = BatchConfig::new(batch_size, max_concurrent);
        assert_eq!(config.batch_size, expected_batch);
        assert_eq!(config.max_concurrent_batches, expected_concurrent);
    }

    #[test]
    fn test_replay_keeps_account_order_across_batches() {
        // With batches of 2, the debit lands in a later batch than the credits
        // it depends on
        let file = create_temp_csv(
            "account,kind,amount,timestamp\n\
             A,credit,60,\n\
             B,credit,10,\n\
             A,credit,40,\n\
             B,debit,10,\n\
             A,debit,100,\n",
        );
        let ledger = ledger(&["A", "B"]);
        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(2, 2));

        let summary = strategy.replay(&ledger, file.path()).unwrap();

        assert_eq!(summary, ReplaySummary { posted: 5, rejected: 0 });
        assert_eq!(ledger.get_account("A").unwrap().balance, dec!(0));
        assert_eq!(ledger.get_account("B").unwrap().balance, dec!(0));
    }

    #[test]
    fn test_replay_counts_parse_and_ledger_rejections() {
        let file = create_temp_csv(
            "account,kind,amount,timestamp\n\
             A,credit,abc,\n\
             A,debit,1,\n\
             A,credit,5,\n",
        );
        let ledger = ledger(&["A"]);
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());

        let summary = strategy.replay(&ledger, file.path()).unwrap();

        assert_eq!(summary, ReplaySummary { posted: 1, rejected: 2 });
        assert_eq!(ledger.get_account("A").unwrap().balance, dec!(5));
    }

    #[test]
    fn test_replay_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());
        let result = strategy.replay(&ledger(&[]), Path::new("/nonexistent.csv"));
        assert!(matches!(result, Err(LedgerError::IoError { .. })));
    }
}
