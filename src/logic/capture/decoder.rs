//! Frame Decoder
//!
//! Turns one candump text line into a decoded `CanRecord`.
//! Pure functions - no shared state, no IO.

use std::fmt;

use crate::constants::{MAX_EXTENDED_ID, MAX_FRAME_BYTES, PDU2_PF_MIN};

use super::record::{CanRecord, PduFormat};

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// Why one capture line failed structural decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Line has fewer than the four fixed fields
    TooShort,
    /// Timestamp is not `(<float-seconds>)`
    BadTimestamp(String),
    /// Identifier is not hex or exceeds 29 bits
    BadIdentifier(String),
    /// Length code is not `[<int>]` or exceeds 8
    BadLengthCode(String),
    /// Line declares more payload bytes than it carries
    TruncatedPayload { expected: usize, found: usize },
    /// A payload token is not a hex byte
    BadPayloadByte(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TooShort => write!(f, "line too short"),
            ParseError::BadTimestamp(t) => write!(f, "bad timestamp '{}'", t),
            ParseError::BadIdentifier(t) => write!(f, "bad identifier '{}'", t),
            ParseError::BadLengthCode(t) => write!(f, "bad length code '{}'", t),
            ParseError::TruncatedPayload { expected, found } => {
                write!(f, "payload truncated: expected {} bytes, found {}", expected, found)
            }
            ParseError::BadPayloadByte(t) => write!(f, "bad payload byte '{}'", t),
        }
    }
}

// ============================================================================
// J1939 FIELD EXTRACTION
// ============================================================================

/// J1939 sub-fields of one 29-bit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct J1939Fields {
    pub priority: u8,
    pub pgn: u32,
    pub addressing: PduFormat,
    pub destination: Option<u8>,
    pub source: u8,
}

/// Extract priority, PGN, addressing mode and addresses from an identifier.
///
/// PF >= 240 is PDU2 (broadcast): PS extends the PGN and there is no
/// destination. PF < 240 is PDU1 (destination-specific): PS is the
/// destination address and the PGN low byte is zeroed.
pub fn extract_j1939(can_id: u32) -> J1939Fields {
    let priority = ((can_id >> 26) & 0x7) as u8;
    let pf = ((can_id >> 16) & 0xFF) as u8;
    let ps = ((can_id >> 8) & 0xFF) as u8;
    let source = (can_id & 0xFF) as u8;

    if pf >= PDU2_PF_MIN {
        J1939Fields {
            priority,
            pgn: ((pf as u32) << 8) | ps as u32,
            addressing: PduFormat::Broadcast,
            destination: None,
            source,
        }
    } else {
        J1939Fields {
            priority,
            pgn: (pf as u32) << 8,
            addressing: PduFormat::DestinationSpecific,
            destination: Some(ps),
            source,
        }
    }
}

// ============================================================================
// LINE DECODING
// ============================================================================

/// Decode one candump line: `(<secs>) <iface> <HEX-ID> [<dlc>] <byte> ...`
///
/// Byte tokens may be 1 or 2 hex digits; each is normalized to exactly two
/// uppercase digits so the payload string is always `2 * dlc` wide.
pub fn decode_line(line: &str) -> Result<CanRecord, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(ParseError::TooShort);
    }

    let timestamp = parts[0]
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .and_then(|t| t.parse::<f64>().ok())
        .ok_or_else(|| ParseError::BadTimestamp(parts[0].to_string()))?;

    let iface = parts[1].to_string();

    let can_id = u32::from_str_radix(parts[2], 16)
        .ok()
        .filter(|id| *id <= MAX_EXTENDED_ID)
        .ok_or_else(|| ParseError::BadIdentifier(parts[2].to_string()))?;

    let dlc = parts[3]
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .and_then(|t| t.parse::<usize>().ok())
        .filter(|n| *n <= MAX_FRAME_BYTES)
        .ok_or_else(|| ParseError::BadLengthCode(parts[3].to_string()))?;

    let tokens = &parts[4..];
    if tokens.len() < dlc {
        return Err(ParseError::TruncatedPayload {
            expected: dlc,
            found: tokens.len(),
        });
    }

    let mut data = String::with_capacity(dlc * 2);
    for token in &tokens[..dlc] {
        let byte = u8::from_str_radix(token, 16)
            .map_err(|_| ParseError::BadPayloadByte(token.to_string()))?;
        data.push_str(&format!("{:02X}", byte));
    }

    let fields = extract_j1939(can_id);
    Ok(CanRecord::new(timestamp, iface, can_id, data, fields))
}

// ============================================================================
// TESTS
// ============================================================================
