// CLI module
// Command-line interface, argument parsing and the end-to-end run

mod args;

pub use args::{CliArgs, StrategyType};

use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use crate::core::Ledger;
use crate::io::{load_accounts, load_customers, write_accounts_csv};
use crate::strategy::create_strategy;
use crate::types::{LedgerError, StatementReport};

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints its message and exits the
/// process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Run the whole program against `output`
///
/// Loads customers and accounts, replays the movements with the selected
/// strategy, then writes either the balances CSV or the requested statement.
///
/// # Errors
///
/// Any failure to load master data, read the movements file, build the
/// statement or write the output.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), LedgerError> {
    let ledger = Arc::new(Ledger::new());

    load_customers(&args.customers_file, &ledger)?;
    load_accounts(&args.accounts_file, &ledger)?;

    let config = matches!(args.strategy, StrategyType::Async).then(|| args.to_batch_config());
    let strategy = create_strategy(args.strategy.clone(), config);
    let summary = strategy.replay(&ledger, &args.movements_file)?;
    info!(
        posted = summary.posted,
        rejected = summary.rejected,
        "movements replayed"
    );

    let Some(customer) = args.statement else {
        return write_accounts_csv(&ledger.list_accounts(), output);
    };

    match ledger.get_statement(customer, args.from, args.to, args.format)? {
        StatementReport::Structured(statement) => {
            serde_json::to_writer_pretty(&mut *output, &statement).map_err(|e| {
                LedgerError::IoError {
                    message: format!("Failed to write statement: {}", e),
                }
            })?;
            writeln!(output)?;
        }
        StatementReport::Document(document) => output.write_all(&document.bytes)?,
    }
    output.flush()?;

    Ok(())
}
