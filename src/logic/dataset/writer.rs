//! Dataset Writer
//!
//! Serializes the annotated record store to CSV, one row per record in
//! original parse order, columns matching the record fields.

use std::io;
use std::path::Path;

use crate::logic::capture::CanRecord;

/// Write all records to `path` and return the row count
pub fn write_csv(records: &[CanRecord], path: &Path) -> io::Result<usize> {
    let mut writer = csv::Writer::from_path(path).map_err(io::Error::other)?;

    for record in records {
        writer.serialize(record).map_err(io::Error::other)?;
    }
    writer.flush()?;

    Ok(records.len())
}
