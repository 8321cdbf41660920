//! Batch replay with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which replays batches of
//! movement requests concurrently while keeping each account's requests in
//! their input order.
//!
//! # Design
//!
//! A batch is partitioned by account number. Each partition runs on its own
//! tokio task; requests inside a partition are applied one after the other.
//! Postings on different accounts never contend except on shared map shards,
//! and postings on the same account stay in file order, so every account ends
//! up with the same balance as a sequential replay.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── Arc<Ledger>  (shared ledger)
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

use crate::core::ledger::Ledger;
use crate::types::{LedgerError, MovementRequest, MovementView};

/// Outcome of replaying a single request
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The request that was applied
    pub request: MovementRequest,

    /// The posted movement or the reason it was rejected
    pub result: Result<MovementView, LedgerError>,
}

/// Replays batches against a shared ledger
#[derive(Clone)]
pub struct BatchProcessor {
    ledger: Arc<Ledger>,
}

impl BatchProcessor {
    /// Create a processor over a shared ledger
    ///
    /// # Arguments
    ///
    /// * `ledger` - Ledger every request of every batch is applied to
    ///
    /// # Returns
    ///
    /// A `BatchProcessor` that can be cloned into per-account tasks
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    /// Group a batch by account number, preserving order within each group
    pub fn partition_by_account(
        &self,
        batch: Vec<MovementRequest>,
    ) -> HashMap<String, Vec<MovementRequest>> {
        let mut partitions: HashMap<String, Vec<MovementRequest>> = HashMap::new();

        for request in batch {
            partitions
                .entry(request.account.clone())
                .or_default()
                .push(request);
        }

        partitions
    }

    /// Apply one account's requests sequentially
    pub async fn process_account_requests(
        &self,
        requests: Vec<MovementRequest>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let result = self.ledger.apply(&request);
            results.push(ProcessingResult { request, result });
        }

        results
    }

    /// Apply a batch, one task per account
    ///
    /// Results are grouped by account; their order across accounts is not
    /// specified. Every request yields exactly one result: if an account's
    /// task fails, each of its requests is reported as a
    /// [`LedgerError::StorageFailure`].
    ///
    /// # Arguments
    ///
    /// * `batch` - Requests in file order
    ///
    /// # Returns
    ///
    /// One [`ProcessingResult`] per request in `batch`
    pub async fn process_batch(&self, batch: Vec<MovementRequest>) -> Vec<ProcessingResult> {
        let partitions = self.partition_by_account(batch);

        let mut tasks = Vec::with_capacity(partitions.len());
        for (account, requests) in partitions {
            let processor = self.clone();
            let pending = requests.clone();
            let task = tokio::spawn(async move {
                processor.process_account_requests(requests).await
            });
            tasks.push((account, pending, task));
        }

        let mut results = Vec::new();
        for (account, pending, task) in tasks {
            match task.await {
                Ok(account_results) => results.extend(account_results),
                Err(e) => {
                    error!(
                        account = %account,
                        requests = pending.len(),
                        error = %e,
                        "replay task failed"
                    );
                    let failure = LedgerError::storage_failure(format!(
                        "replay task for account {} failed: {}",
                        account, e
                    ));
                    results.extend(pending.into_iter().map(|request| ProcessingResult {
                        request,
                        result: Err(failure.clone()),
                    }));
                }
            }
        }

        results
    }
}
