//! Statement types
//!
//! A statement is a derived, non-persisted view built fresh per request. The
//! output format is chosen by [`StatementFormat`] and the result is a
//! [`StatementReport`] variant rather than a loosely typed payload.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use super::account::AccountType;
use super::customer::CustomerId;
use super::movement::MovementKind;

/// One movement as printed on a statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementLine {
    pub date: NaiveDate,
    pub kind: MovementKind,
    /// Negative for debits
    pub signed_amount: Decimal,
    /// Balance stamped on the movement when it was posted
    pub available_balance: Decimal,
}

/// Per-account section of a statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountStatement {
    pub number: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Balance right before the first movement of the window
    pub opening_balance: Decimal,
    pub active: bool,
    pub movements: Vec<MovementLine>,
    pub total_credits: Decimal,
    pub total_debits: Decimal,
    /// `balance_after` of the last movement of the window
    pub closing_balance: Decimal,
}

/// Account statement for one customer over a date window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub customer_id: CustomerId,
    /// Customer display name
    pub customer: String,
    pub generated_at: NaiveDate,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub accounts: Vec<AccountStatement>,
}

/// Requested statement output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatementFormat {
    /// The [`Statement`] value itself
    #[default]
    Structured,
    /// A rendered document artifact
    Document,
}

impl FromStr for StatementFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structured" | "json" => Ok(StatementFormat::Structured),
            "document" | "pdf" | "text" => Ok(StatementFormat::Document),
            other => Err(format!("Invalid statement format '{}'", other)),
        }
    }
}

/// Rendered statement artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Statement in the format the caller asked for
#[derive(Debug, Clone, PartialEq)]
pub enum StatementReport {
    Structured(Statement),
    Document(RenderedDocument),
}
