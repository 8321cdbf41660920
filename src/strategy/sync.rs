//! Synchronous replay strategy
//!
//! Streams the movements file with [`SyncReader`] and applies each request to
//! the ledger as soon as it is read. Single-threaded, constant memory.

use crate::core::Ledger;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, ReplaySummary};
use crate::types::LedgerError;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn replay(
        &self,
        ledger: &Arc<Ledger>,
        movements_path: &Path,
    ) -> Result<ReplaySummary, LedgerError> {
        let reader = SyncReader::new(movements_path)?;
        let mut summary = ReplaySummary::default();

        for result in reader {
            match result.and_then(|request| ledger.apply(&request)) {
                Ok(_) => summary.posted += 1,
                Err(e) => {
                    summary.rejected += 1;
                    warn!(error = %e, "movement rejected");
                }
            }
        }

        debug!(
            posted = summary.posted,
            rejected = summary.rejected,
            "sync replay finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountDraft, AccountType, CustomerDraft, Gender, Person};
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

    fn ledger() -> Arc<Ledger> {
        let ledger = Ledger::new();
        let customer = ledger
            .create_customer(CustomerDraft::new(Person {
                name: "Jose Lema".to_string(),
                gender: Gender::Male,
                age: 40,
                identification: "098254785".to_string(),
                address: "Otavalo".to_string(),
                phone: "098254785".to_string(),
            }))
            .unwrap();
        ledger
            .create_account(
                AccountDraft::new("478758", AccountType::Savings, customer.id)
                    .with_balance(dec!(2000)),
            )
            .unwrap();
        Arc::new(ledger)
    }

    #[test]
    fn test_replay_applies_movements() {
        let file = create_temp_csv(
            "account,kind,amount,timestamp\n\
             478758,debit,575,2024-02-10T09:30:00\n\
             478758,credit,100,\n",
        );
        let ledger = ledger();

        let summary = SyncProcessingStrategy.replay(&ledger, file.path()).unwrap();

        assert_eq!(summary, ReplaySummary { posted: 2, rejected: 0 });
        assert_eq!(ledger.get_account("478758").unwrap().balance, dec!(1525));
    }

    #[test]
    fn test_replay_counts_rejections() {
        let file = create_temp_csv(
            "account,kind,amount,timestamp\n\
             478758,debit,5000,\n\
             999999,credit,10,\n\
             478758,credit,0,\n\
             478758,bonus,10,\n\
             478758,credit,10,\n",
        );
        let ledger = ledger();

        let summary = SyncProcessingStrategy.replay(&ledger, file.path()).unwrap();

        assert_eq!(summary, ReplaySummary { posted: 1, rejected: 4 });
        assert_eq!(ledger.get_account("478758").unwrap().balance, dec!(2010));
    }

    #[test]
    fn test_replay_missing_file() {
        let result = SyncProcessingStrategy.replay(&ledger(), Path::new("/nonexistent.csv"));
        assert!(matches!(result, Err(LedgerError::IoError { .. })));
    }
}
