//! Message-of-Interest Filter
//!
//! Declarative predicate selecting which records a rule considers.
//! Filtering is conjunctive and never mutates the store.

use serde::{Deserialize, Serialize};

use crate::logic::capture::CanRecord;

/// Filter options; every unset option imposes no constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFilter {
    #[serde(default)]
    pub pgn: Option<u32>,
    #[serde(default)]
    pub sa: Option<u8>,
    #[serde(default)]
    pub da: Option<u8>,
    #[serde(default)]
    pub priority_min: Option<u8>,
    #[serde(default)]
    pub priority_max: Option<u8>,
}

impl MessageFilter {
    /// AND of every set option; an empty filter matches everything
    pub fn matches(&self, record: &CanRecord) -> bool {
        if let Some(pgn) = self.pgn {
            if record.pgn != pgn {
                return false;
            }
        }
        if let Some(sa) = self.sa {
            if record.source != sa {
                return false;
            }
        }
        if let Some(da) = self.da {
            if record.destination != Some(da) {
                return false;
            }
        }
        if let Some(min) = self.priority_min {
            if record.priority < min {
                return false;
            }
        }
        if let Some(max) = self.priority_max {
            if record.priority > max {
                return false;
            }
        }
        true
    }
}

/// Indices of all records matching the filter, in store order
pub fn select_indices(records: &[CanRecord], filter: &MessageFilter) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(r))
        .map(|(i, _)| i)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
