//! Customer and account loading
//!
//! Reads the customers and accounts files into a [`Ledger`] before movements
//! are replayed. Unlike movement rows, a bad master row is fatal: replaying
//! against a partial set of accounts would silently reject valid movements.

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::core::ledger::Ledger;
use crate::io::csv_format::{
    convert_account_record, convert_customer_record, AccountRecord, CustomerRecord,
};
use crate::types::LedgerError;

/// Register every customer of the file, in file order
///
/// Customers get ids 1, 2, ... in the order they appear, which is what the
/// accounts file refers to.
///
/// # Errors
///
/// The first unreadable, malformed or conflicting row aborts the load.
pub fn load_customers(path: &Path, ledger: &Ledger) -> Result<usize, LedgerError> {
    let count = for_each_row(path, |line, record: CustomerRecord| {
        let draft = convert_customer_record(record).map_err(|e| e.at_line(line))?;
        ledger.create_customer(draft)?;
        Ok(())
    })?;

    info!(customers = count, path = %path.display(), "customers loaded");
    Ok(count)
}

/// Open every account of the file
///
/// # Errors
///
/// The first unreadable, malformed or conflicting row aborts the load,
/// including a row whose owner is unknown.
pub fn load_accounts(path: &Path, ledger: &Ledger) -> Result<usize, LedgerError> {
    let count = for_each_row(path, |line, record: AccountRecord| {
        let draft = convert_account_record(record).map_err(|e| e.at_line(line))?;
        ledger.create_account(draft)?;
        Ok(())
    })?;

    info!(accounts = count, path = %path.display(), "accounts loaded");
    Ok(count)
}

fn for_each_row<T, F>(path: &Path, mut f: F) -> Result<usize, LedgerError>
where
    T: DeserializeOwned,
    F: FnMut(u64, T) -> Result<(), LedgerError>,
{
    let file = File::open(path).map_err(|e| LedgerError::IoError {
        message: format!("Failed to open file '{}': {}", path.display(), e),
    })?;
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);

    let mut count = 0;
    for (index, row) in reader.deserialize::<T>().enumerate() {
        // Header is line 1
        let line = index as u64 + 2;
        f(line, row?)?;
        count += 1;
    }

    Ok(count)
}
