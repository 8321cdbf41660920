//! Synchronous movement reader
//!
//! Streams movement rows from a CSV file one at a time, converting each into a
//! [`MovementRequest`]. Memory use stays constant whatever the file size.

use crate::io::csv_format::{convert_movement_record, MovementRecord};
use crate::types::{LedgerError, MovementRequest};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Iterator over the movement requests of a CSV file
///
/// Every item carries its own result, so one bad row never stops the stream.
/// Errors are tagged with the 1-based file line (the header is line 1).
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Open a movements file
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::IoError`] if the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<MovementRequest, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<MovementRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;

        Some(
            row.map_err(LedgerError::from)
                .and_then(convert_movement_record)
                .map_err(|e| e.at_line(self.line_num)),
        )
    }
}
