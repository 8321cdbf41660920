//! Plain-text statement document
//!
//! Renders a built [`Statement`] into a printable document. Rendering is pure
//! formatting: every figure comes from the statement as built.

use std::fmt::{self, Write};

use crate::io::csv_format::format_amount;
use crate::types::{LedgerError, RenderedDocument, Statement};

pub const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Render a statement into a text document
///
/// # Errors
///
/// Returns [`LedgerError::IoError`] if the document cannot be formatted.
pub fn render(statement: &Statement) -> Result<RenderedDocument, LedgerError> {
    Ok(RenderedDocument {
        content_type: CONTENT_TYPE,
        bytes: render_text(statement)?.into_bytes(),
    })
}

/// Render a statement into its text form
///
/// Field order: title, report date, customer, then per account its number,
/// type, opening balance, status, totals, closing balance and one line per
/// movement. Amounts print with at least two decimal places and are never
/// rounded.
pub fn render_text(statement: &Statement) -> Result<String, LedgerError> {
    let mut out = String::new();
    write_document(&mut out, statement).map_err(|e| LedgerError::IoError {
        message: format!("Failed to render statement: {}", e),
    })?;
    Ok(out)
}

fn write_document(out: &mut impl Write, statement: &Statement) -> fmt::Result {
    writeln!(out, "ACCOUNT STATEMENT")?;
    writeln!(
        out,
        "Report date: {}",
        statement.generated_at.format(DATE_FORMAT)
    )?;
    writeln!(out, "Customer: {}", statement.customer)?;
    writeln!(
        out,
        "Period: {} - {}",
        statement.start.format(DATE_FORMAT),
        statement.end.format(DATE_FORMAT)
    )?;

    for account in &statement.accounts {
        writeln!(out)?;
        writeln!(out, "Account: {}", account.number)?;
        writeln!(out, "Type: {}", account.account_type)?;
        writeln!(out, "Opening balance: {}", format_amount(account.opening_balance))?;
        writeln!(
            out,
            "Status: {}",
            if account.active { "ACTIVE" } else { "INACTIVE" }
        )?;
        writeln!(out, "Total credits: {}", format_amount(account.total_credits))?;
        writeln!(out, "Total debits: {}", format_amount(account.total_debits))?;
        writeln!(out, "Closing balance: {}", format_amount(account.closing_balance))?;
        writeln!(
            out,
            "{:<12}{:<8}{:>14}{:>14}",
            "Date", "Kind", "Amount", "Balance"
        )?;
        for line in &account.movements {
            writeln!(
                out,
                "{:<12}{:<8}{:>14}{:>14}",
                line.date.format(DATE_FORMAT).to_string(),
                line.kind.to_string(),
                format_amount(line.signed_amount),
                format_amount(line.available_balance)
            )?;
        }
    }

    Ok(())
}
