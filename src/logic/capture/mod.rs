//! Capture Module - Frame Decoding & Record Store
//!
//! Reads candump text captures into an in-memory record store and
//! attaches optional PGN display labels. The store is an owned Vec passed
//! by exclusive reference through the rest of the pipeline.

pub mod decoder;
pub mod record;

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub use decoder::{decode_line, extract_j1939, J1939Fields, ParseError};
pub use record::{CanRecord, PduFormat};

/// Parse a candump capture file into the record store.
///
/// Blank lines are ignored. Malformed lines are logged and skipped - they
/// never abort the run. An unopenable file is an error.
pub fn parse_capture(path: &Path) -> io::Result<Vec<CanRecord>> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match decode_line(trimmed) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                log::warn!("Failed to parse line: {} ({})", trimmed, e);
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} malformed lines", skipped);
    }
    Ok(records)
}

/// Load the optional PGN -> display label table from a JSON object file.
/// Keys are decimal PGN numbers as strings.
pub fn load_pgn_labels(path: &Path) -> Result<HashMap<u32, String>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read label table {}: {}", path.display(), e))?;
    let raw: HashMap<String, String> = serde_json::from_str(&text)
        .map_err(|e| format!("invalid label table {}: {}", path.display(), e))?;

    let mut table = HashMap::with_capacity(raw.len());
    for (key, label) in raw {
        let pgn = key
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid PGN key '{}' in label table", key))?;
        table.insert(pgn, label);
    }
    Ok(table)
}

/// Fill `pgn_label` on every record with an entry in the table.
pub fn apply_pgn_labels(records: &mut [CanRecord], table: &HashMap<u32, String>) {
    for record in records.iter_mut() {
        if let Some(label) = table.get(&record.pgn) {
            record.pgn_label = Some(label.clone());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
