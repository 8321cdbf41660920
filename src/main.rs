//! Account Ledger CLI
//!
//! Replays account movements from CSV files and reports the resulting balances
//! or a customer statement.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --customers customers.csv --accounts accounts.csv movements.csv > balances.csv
//! cargo run -- --strategy sync --customers customers.csv --accounts accounts.csv movements.csv
//! cargo run -- --customers customers.csv --accounts accounts.csv movements.csv \
//!     --statement 1 --from 2024-01-01 --to 2024-01-31 --format document
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` (for example `RUST_LOG=debug`) to see
//! more than warnings.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing file, malformed master data, statement failure, etc.)

use account_ledger::cli;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    // Output goes to stdout
    let mut output = std::io::stdout().lock();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
