//! I/O module
//!
//! CSV input and output, plus statement document rendering:
//! - `csv_format` - Row shapes, conversions and the balance output
//! - `sync_reader` - Streaming movement reader
//! - `async_reader` - Batched movement reader for async replay
//! - `master_data` - Customer and account loading
//! - `document` - Plain-text statement document

pub mod async_reader;
pub mod csv_format;
pub mod document;
pub mod master_data;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_account_record, convert_customer_record, convert_movement_record, format_amount,
    parse_timestamp, write_accounts_csv, AccountRecord, CustomerRecord, MovementRecord,
};
pub use master_data::{load_accounts, load_customers};
pub use sync_reader::SyncReader;
