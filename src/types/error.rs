//! Error types for the account ledger
//!
//! This module defines every error that can surface from the ledger engine,
//! the statement builder and the administrative operations around them.
//! Each variant carries the entity identifier and the offending value so a
//! caller can diagnose the failure without retrying.
//!
//! # Error Categories
//!
//! - **Not found**: customer, account or movement absent
//! - **Conflict**: duplicate account number or customer identification
//! - **Invalid input**: zero amounts, unknown movement kinds, malformed CSV
//! - **Insufficient funds**: a debit would take the balance below zero
//! - **Out of order**: a dated movement older than the account's latest one
//! - **No movements in range**: a statement window is empty for an account
//! - **Storage**: any lower-layer persistence or I/O failure

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use thiserror::Error;

use super::customer::CustomerId;
use super::movement::MovementId;

/// Broad classification of a [`LedgerError`]
///
/// Transports map these onto their own status codes. Everything except
/// [`ErrorKind::Storage`] is the caller's fault and must not be retried as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    InsufficientFunds,
    NoMovementsInRange,
    Storage,
}

/// Main error type for the ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No customer is registered under the given id
    #[error("Customer {customer} not found")]
    CustomerNotFound {
        /// The customer id that was looked up
        customer: CustomerId,
    },

    /// No account is registered under the given number
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The account number that was looked up
        account: String,
    },

    /// No movement is stored under the given id
    #[error("Movement {movement} not found")]
    MovementNotFound {
        /// The movement id that was looked up
        movement: MovementId,
    },

    /// An account with this number already exists
    #[error("Account {account} already exists")]
    DuplicateAccount {
        /// The duplicated account number
        account: String,
    },

    /// A customer with this identification already exists
    #[error("Customer with identification {identification} already exists")]
    DuplicateIdentification {
        /// The duplicated identification document
        identification: String,
    },

    /// Movement amount is zero once its sign has been dropped
    #[error("Invalid amount {amount} for account {account}: must be greater than zero")]
    InvalidAmount {
        /// Target account number
        account: String,
        /// The rejected amount as supplied by the caller
        amount: Decimal,
    },

    /// Movement kind is neither credit nor debit
    #[error("Invalid movement kind '{kind}'")]
    InvalidMovementKind {
        /// The rejected kind as supplied by the caller
        kind: String,
    },

    /// Debit would leave the account with a negative balance
    ///
    /// The account balance is guaranteed to be unchanged.
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account number
        account: String,
        /// Balance at the time of the attempt
        balance: Decimal,
        /// Requested debit amount
        requested: Decimal,
    },

    /// Movement is dated before the latest movement already on the account
    ///
    /// Balances are stamped in posting order, so history can only grow
    /// forward in time.
    #[error("Movement for account {account} at {timestamp} is older than its latest movement at {latest}")]
    OutOfOrderMovement {
        /// Account number
        account: String,
        /// Timestamp of the rejected movement
        timestamp: NaiveDateTime,
        /// Timestamp of the account's latest movement
        latest: NaiveDateTime,
    },

    /// An account of the customer has no movements in the statement window
    #[error("No movements for account {account} between {start} and {end}")]
    NoMovementsInRange {
        /// The quiet account
        account: String,
        /// First day of the window (inclusive)
        start: NaiveDate,
        /// Last day of the window (inclusive)
        end: NaiveDate,
    },

    /// Balance arithmetic would overflow the decimal range
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account number
        account: String,
    },

    /// The persistence layer failed
    #[error("Storage failure: {message}")]
    StorageFailure {
        /// Description of the failure
        message: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Classify the error into the ledger's error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::CustomerNotFound { .. }
            | LedgerError::AccountNotFound { .. }
            | LedgerError::MovementNotFound { .. } => ErrorKind::NotFound,
            LedgerError::DuplicateAccount { .. } | LedgerError::DuplicateIdentification { .. } => {
                ErrorKind::Conflict
            }
            LedgerError::InvalidAmount { .. }
            | LedgerError::InvalidMovementKind { .. }
            | LedgerError::OutOfOrderMovement { .. }
            | LedgerError::ArithmeticOverflow { .. }
            | LedgerError::ParseError { .. } => ErrorKind::InvalidInput,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::NoMovementsInRange { .. } => ErrorKind::NoMovementsInRange,
            LedgerError::StorageFailure { .. } | LedgerError::IoError { .. } => ErrorKind::Storage,
        }
    }

    /// Whether the failure was caused by the request rather than the system
    pub fn is_client_error(&self) -> bool {
        self.kind() != ErrorKind::Storage
    }

    /// Create a CustomerNotFound error
    pub fn customer_not_found(customer: CustomerId) -> Self {
        LedgerError::CustomerNotFound { customer }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: &str) -> Self {
        LedgerError::AccountNotFound {
            account: account.to_string(),
        }
    }

    /// Create a MovementNotFound error
    pub fn movement_not_found(movement: MovementId) -> Self {
        LedgerError::MovementNotFound { movement }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: &str) -> Self {
        LedgerError::DuplicateAccount {
            account: account.to_string(),
        }
    }

    /// Create a DuplicateIdentification error
    pub fn duplicate_identification(identification: &str) -> Self {
        LedgerError::DuplicateIdentification {
            identification: identification.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(account: &str, amount: Decimal) -> Self {
        LedgerError::InvalidAmount {
            account: account.to_string(),
            amount,
        }
    }

    /// Create an InvalidMovementKind error
    pub fn invalid_movement_kind(kind: &str) -> Self {
        LedgerError::InvalidMovementKind {
            kind: kind.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &str, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account: account.to_string(),
            balance,
            requested,
        }
    }

    /// Create an OutOfOrderMovement error
    pub fn out_of_order_movement(
        account: &str,
        timestamp: NaiveDateTime,
        latest: NaiveDateTime,
    ) -> Self {
        LedgerError::OutOfOrderMovement {
            account: account.to_string(),
            timestamp,
            latest,
        }
    }

    /// Create a NoMovementsInRange error
    pub fn no_movements_in_range(account: &str, start: NaiveDate, end: NaiveDate) -> Self {
        LedgerError::NoMovementsInRange {
            account: account.to_string(),
            start,
            end,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }

    /// Create a StorageFailure error
    pub fn storage_failure(message: impl Into<String>) -> Self {
        LedgerError::StorageFailure {
            message: message.into(),
        }
    }

    /// Create a ParseError error
    pub fn parse_error(line: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Attach a line number to a parse error that has none
    pub fn at_line(self, line: u64) -> Self {
        match self {
            LedgerError::ParseError {
                line: None,
                message,
            } => LedgerError::ParseError {
                line: Some(line),
                message,
            },
            other => other,
        }
    }
}
