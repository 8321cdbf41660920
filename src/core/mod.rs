//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Storage and clock seams
//! - `clock` - System and manual clocks
//! - `customer_directory` - Customer records
//! - `account_store` - Account records and per-account locked updates
//! - `movement_store` - In-memory movement storage
//! - `engine` - Balance-mutating posting rules
//! - `query` - Movement reads over date windows
//! - `statement_builder` - Statement aggregation
//! - `ledger` - Facade over all of the above
//! - `batch_processor` - Concurrent replay partitioned by account

pub mod account_store;
pub mod batch_processor;
pub mod clock;
pub mod customer_directory;
pub mod engine;
pub mod ledger;
pub mod movement_store;
pub mod query;
pub mod statement_builder;
pub mod traits;

pub use account_store::AccountStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use clock::{ManualClock, SystemClock};
pub use customer_directory::CustomerDirectory;
pub use engine::LedgerEngine;
pub use ledger::Ledger;
pub use movement_store::InMemoryMovementStore;
pub use query::{DateWindow, MovementQuery};
pub use statement_builder::StatementBuilder;
pub use traits::{Clock, MovementStore};
