use crate::strategy::BatchConfig;
use crate::types::{CustomerId, StatementFormat};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay account movements and report balances or a customer statement
#[derive(Parser, Debug)]
#[command(name = "account-ledger")]
#[command(about = "Replay account movements and report balances or statements", long_about = None)]
pub struct CliArgs {
    /// Movements CSV file
    #[arg(value_name = "MOVEMENTS", help = "Path to the movements CSV file")]
    pub movements_file: PathBuf,

    /// Customers CSV file
    #[arg(long = "customers", value_name = "CSV", help = "Path to the customers CSV file")]
    pub customers_file: PathBuf,

    /// Accounts CSV file
    #[arg(long = "accounts", value_name = "CSV", help = "Path to the accounts CSV file")]
    pub accounts_file: PathBuf,

    /// Replay strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Replay strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of movements per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of movements per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Worker threads applying a batch (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Print this customer's statement instead of the balances
    #[arg(long = "statement", value_name = "CUSTOMER_ID")]
    pub statement: Option<CustomerId>,

    /// First day of the statement window (YYYY-MM-DD)
    #[arg(long = "from", value_name = "DATE", requires = "statement")]
    pub from: Option<NaiveDate>,

    /// Last day of the statement window (YYYY-MM-DD)
    #[arg(long = "to", value_name = "DATE", requires = "statement")]
    pub to: Option<NaiveDate>,

    /// Statement output format
    #[arg(
        long = "format",
        value_name = "FORMAT",
        default_value = "structured",
        requires = "statement",
        help = "Statement format: 'structured' (JSON) or 'document' (text)"
    )]
    pub format: StatementFormat,
}

/// Available replay strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values take their defaults; zero values are replaced by the
    /// defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }
}
