//! Central Configuration Constants
//!
//! Single source of truth for protocol and labeling defaults.

/// PDU format boundary: PF values at or above this are PDU2 (broadcast)
pub const PDU2_PF_MIN: u8 = 240;

/// Maximum payload bytes in one classic CAN frame
pub const MAX_FRAME_BYTES: usize = 8;

/// Largest valid 29-bit extended identifier
pub const MAX_EXTENDED_ID: u32 = 0x1FFF_FFFF;

/// Label carried by every record until a rule fires
pub const NORMAL_LABEL: &str = "normal";

/// Label applied by a firing rule when the rule file gives none
pub const ANOMALOUS_LABEL: &str = "anomalous";

/// Separator between accumulated rule names on one record
pub const RULE_NAME_SEP: char = '|';

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
