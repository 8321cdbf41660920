//! Account Ledger Library
//! # Overview
//!
//! This library implements a small financial ledger: customers own accounts,
//! credit and debit movements are posted against accounts with a running
//! balance, and account statements are built over date windows.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Customer, Account, Movement, Statement, errors)
//! - [`cli`] - CLI arguments parsing and the end-to-end run
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Posting rules, the only place balances change
//!   - [`core::account_store`] - Account records with per-account locking
//!   - [`core::movement_store`] - Posted movement history
//!   - [`core::query`] - Movement reads by account and customer
//!   - [`core::statement_builder`] - Statement aggregation
//!   - [`core::ledger`] - Facade over every operation
//! - [`io`] - CSV input/output and statement documents
//! - [`strategy`] - Sync and async replay of movement files
//!
//! # Posting Rules
//!
//! - The amount's sign is ignored; the movement kind sets the direction
//! - A zero amount is rejected
//! - A debit may never take a balance below zero
//! - Each movement is stamped with the balance it produced, and the account
//!   balance always equals the stamp of its latest movement
//!
//! # Statements
//!
//! A statement lists, for each account of a customer, the movements inside a
//! window of whole days with their totals and closing balance. If any account
//! has no movement in the window, the statement fails as a whole.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{Ledger, LedgerEngine};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountType, Customer, CustomerId, LedgerError, Movement, MovementKind,
    MovementView, Statement, StatementFormat, StatementReport,
};
