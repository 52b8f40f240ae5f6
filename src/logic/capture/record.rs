//! Decoded Record Types
//!
//! KHÔNG chứa logic - chỉ data structures.
//! One `CanRecord` per successfully parsed capture line.

use serde::{Deserialize, Serialize};

use crate::constants::NORMAL_LABEL;

use super::decoder::J1939Fields;

// ============================================================================
// PDU ADDRESSING
// ============================================================================

/// J1939 PDU addressing mode, derived from the PDU format byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PduFormat {
    /// PDU1 (PF < 240): PS carries the destination address
    DestinationSpecific,
    /// PDU2 (PF >= 240): PS extends the group number
    Broadcast,
}

impl PduFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PduFormat::DestinationSpecific => "destination-specific",
            PduFormat::Broadcast => "broadcast",
        }
    }
}

impl std::fmt::Display for PduFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DECODED RECORD
// ============================================================================

/// One decoded frame plus its label and rule provenance.
///
/// `pgn`, `destination` and `addressing` are pure functions of `can_id`.
/// `rule_name` only grows during one evaluation pass; the remaining
/// provenance fields always reflect the highest-severity rule so far.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CanRecord {
    pub timestamp: f64,
    pub iface: String,
    pub can_id: u32,
    /// Payload as fixed-width uppercase hex, two digits per byte
    pub data: String,

    // J1939 fields
    pub priority: u8,
    pub pgn: u32,
    pub addressing: PduFormat,
    pub destination: Option<u8>,
    pub source: u8,

    /// Optional display name for the PGN, from the label lookup table
    pub pgn_label: Option<String>,

    // Label + provenance, filled by the rule engine
    pub label: String,
    pub rule_name: String,
    pub rule_type: String,
    pub semantics: String,
    pub rule_severity: String,
    pub rule_layer: String,
    pub rule_description: String,
    pub context_pgn: String,
    pub context_value: Option<f64>,
}

impl CanRecord {
    /// Fresh record with the default label and empty provenance
    pub fn new(timestamp: f64, iface: String, can_id: u32, data: String, fields: J1939Fields) -> Self {
        Self {
            timestamp,
            iface,
            can_id,
            data,
            priority: fields.priority,
            pgn: fields.pgn,
            addressing: fields.addressing,
            destination: fields.destination,
            source: fields.source,
            pgn_label: None,
            label: NORMAL_LABEL.to_string(),
            rule_name: String::new(),
            rule_type: String::new(),
            semantics: String::new(),
            rule_severity: String::new(),
            rule_layer: String::new(),
            rule_description: String::new(),
            context_pgn: String::new(),
            context_value: None,
        }
    }
}
