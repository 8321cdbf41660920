//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `customer`: Customer and personal data
//! - `account`: Account records and administrative inputs
//! - `movement`: Posted movements and their caller-facing view
//! - `statement`: Derived statement views and output formats
//! - `error`: Error types for the ledger

pub mod account;
pub mod customer;
pub mod error;
pub mod movement;
pub mod statement;

pub use account::{Account, AccountDraft, AccountId, AccountType, AccountUpdate};
pub use customer::{Customer, CustomerDraft, CustomerId, Gender, Person};
pub use error::{ErrorKind, LedgerError};
pub use movement::{
    Movement, MovementId, MovementKind, MovementRequest, MovementView, NewMovement,
};
pub use statement::{
    AccountStatement, MovementLine, RenderedDocument, Statement, StatementFormat,
    StatementReport,
};
