//! CSV format handling
//!
//! Row shapes for the three input files and their conversion into ledger
//! inputs, plus the account balance output.
//!
//! # Input formats
//!
//! ```csv
//! name,gender,age,identification,address,phone,active
//! Jose Lema,male,40,098254785,Otavalo sn y principal,098254785,true
//! ```
//!
//! ```csv
//! number,type,balance,active,owner
//! 478758,savings,2000,true,1
//! ```
//!
//! ```csv
//! account,kind,amount,timestamp
//! 478758,debit,575,2024-02-10T09:30:00
//! 225487,credit,600,
//! ```
//!
//! Empty `active` means active, empty `balance` means zero and an empty
//! `timestamp` means "now".
//!
//! # Output format
//!
//! ```csv
//! number,type,balance,active,owner
//! 478758,SAVINGS,1425.00,true,1
//! ```

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

use crate::types::{
    Account, AccountDraft, AccountType, CustomerDraft, CustomerId, Gender, LedgerError,
    MovementKind, MovementRequest, Person,
};

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Raw customer row
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CustomerRecord {
    pub name: String,
    pub gender: String,
    pub age: u8,
    pub identification: String,
    pub address: String,
    pub phone: String,
    pub active: Option<String>,
}

/// Raw account row
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountRecord {
    pub number: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: Option<String>,
    pub active: Option<String>,
    pub owner: CustomerId,
}

/// Raw movement row
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MovementRecord {
    pub account: String,
    pub kind: String,
    pub amount: String,
    pub timestamp: Option<String>,
}

pub fn convert_customer_record(record: CustomerRecord) -> Result<CustomerDraft, LedgerError> {
    let gender = Gender::from_str(&record.gender).map_err(|e| LedgerError::parse_error(None, e))?;
    let active = parse_flag(record.active.as_deref())?;

    Ok(CustomerDraft {
        person: Person {
            name: record.name,
            gender,
            age: record.age,
            identification: record.identification,
            address: record.address,
            phone: record.phone,
        },
        active,
    })
}

pub fn convert_account_record(record: AccountRecord) -> Result<AccountDraft, LedgerError> {
    let account_type = AccountType::from_str(&record.account_type)
        .map_err(|e| LedgerError::parse_error(None, e))?;

    let initial_balance = match record.balance.as_deref().map(str::trim) {
        Some(balance) if !balance.is_empty() => Some(parse_decimal(balance)?),
        _ => None,
    };

    Ok(AccountDraft {
        number: record.number,
        account_type,
        initial_balance,
        active: parse_flag(record.active.as_deref())?,
        owner: record.owner,
    })
}

/// Convert a movement row into a posting request
///
/// # Errors
///
/// - [`LedgerError::InvalidMovementKind`] for an unknown kind
/// - [`LedgerError::ParseError`] for a malformed amount or timestamp
pub fn convert_movement_record(record: MovementRecord) -> Result<MovementRequest, LedgerError> {
    let kind = MovementKind::from_str(&record.kind)?;
    let amount = parse_decimal(&record.amount)?;

    let timestamp = match record.timestamp.as_deref().map(str::trim) {
        Some(timestamp) if !timestamp.is_empty() => Some(parse_timestamp(timestamp)?),
        _ => None,
    };

    Ok(MovementRequest {
        account: record.account,
        kind,
        amount,
        timestamp,
    })
}

/// Parse `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD HH:MM:SS`
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, LedgerError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input.trim(), format).ok())
        .ok_or_else(|| LedgerError::parse_error(None, format!("Invalid timestamp '{}'", input)))
}

fn parse_decimal(input: &str) -> Result<Decimal, LedgerError> {
    Decimal::from_str(input.trim())
        .map_err(|_| LedgerError::parse_error(None, format!("Invalid amount '{}'", input)))
}

fn parse_flag(input: Option<&str>) -> Result<bool, LedgerError> {
    match input.map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("") => Ok(true),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(LedgerError::parse_error(
            None,
            format!("Invalid active flag '{}'", other),
        )),
    }
}

/// Format an amount with at least two decimal places
///
/// Amounts carrying more places keep all of them; nothing is rounded.
pub fn format_amount(amount: Decimal) -> String {
    let places = amount.scale().max(2) as usize;
    format!("{:.*}", places, amount)
}

/// Write account balances as CSV, sorted by account number
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["number", "type", "balance", "active", "owner"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.number.cmp(&b.number));

    for account in sorted_accounts {
        writer.write_record(&[
            account.number,
            account.account_type.to_string(),
            format_amount(account.balance),
            account.active.to_string(),
            account.owner.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
