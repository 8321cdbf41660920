//! Core traits for the storage and time seams of the ledger
//!
//! The ledger engine and the statement builder only talk to movement storage
//! and to the clock through these traits, so a durable backend or a fixed test
//! clock can be swapped in without touching the business rules.

use chrono::NaiveDateTime;

use crate::types::{LedgerError, Movement, MovementId, NewMovement};

/// Append-only store of posted movements
///
/// Implementations assign movement ids and must be safe to share across
/// threads. Any backend failure is reported as
/// [`LedgerError::StorageFailure`]; nothing is retried here.
pub trait MovementStore: Send + Sync {
    /// Persist a new movement and return it with its assigned id
    fn append(&self, movement: NewMovement) -> Result<Movement, LedgerError>;

    /// Get a movement by id
    fn get(&self, id: MovementId) -> Result<Option<Movement>, LedgerError>;

    /// All movements of an account, ordered by timestamp then insertion
    ///
    /// The returned list is a consistent snapshot of the account's movements.
    fn list_by_account(&self, account: &str) -> Result<Vec<Movement>, LedgerError>;

    /// Timestamp of the account's latest movement, if it has any
    fn latest_timestamp(&self, account: &str) -> Result<Option<NaiveDateTime>, LedgerError>;

    /// Remove a single movement, returning it if it existed
    fn remove(&self, id: MovementId) -> Result<Option<Movement>, LedgerError>;

    /// Remove every movement of an account, returning how many were removed
    fn remove_account(&self, account: &str) -> Result<usize, LedgerError>;
}

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
