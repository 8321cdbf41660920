//! Replay strategies
//!
//! This module defines how a movements file is replayed into a [`Ledger`].
//!
//! # Available Strategies
//!
//! - **Sync**: streams the file row by row on the calling thread
//! - **Async**: reads batches with tokio and applies each batch with one task
//!   per account
//!
//! Both strategies apply each account's movements in file order, so they leave
//! every account with the same balance.

use crate::cli::StrategyType;
use crate::core::Ledger;
use crate::types::LedgerError;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Counts of a finished replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Movements posted
    pub posted: usize,
    /// Rows skipped, whether unparseable or refused by the ledger
    pub rejected: usize,
}

/// A way of replaying a movements file
pub trait ProcessingStrategy: Send + Sync {
    /// Replay every movement of `movements_path` into `ledger`
    ///
    /// Rejected rows are logged and counted, never fatal.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be read at all.
    fn replay(
        &self,
        ledger: &Arc<Ledger>,
        movements_path: &Path,
    ) -> Result<ReplaySummary, LedgerError>;
}

/// Create a strategy of the given type
///
/// `config` only matters for the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config.unwrap_or_default())),
    }
}
