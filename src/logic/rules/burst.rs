//! Burst Rule Evaluator
//!
//! Temporal semantics: clusters of closely spaced frames sharing one
//! identifier. A window grows while consecutive gaps stay within the
//! interval (inclusive) and marks its members once it reaches the
//! threshold; annotation happens once per distinct record after the scan.

use std::collections::{BTreeMap, BTreeSet};

use crate::logic::capture::CanRecord;

use super::annotate::annotate;
use super::config::RuleSpec;
use super::filter::{select_indices, MessageFilter};

pub fn apply_burst(
    records: &mut [CanRecord],
    rule: &RuleSpec,
    interval_ms: f64,
    threshold: usize,
    moi: &MessageFilter,
) {
    let interval_secs = interval_ms / 1000.0;

    let eligible = select_indices(records, moi);
    if eligible.is_empty() {
        log::debug!("Rule '{}' matched no records", rule.name);
        return;
    }

    // Group by exact identifier; BTreeMap keeps scan order deterministic
    let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for idx in eligible {
        groups.entry(records[idx].can_id).or_default().push(idx);
    }

    let mut fired: BTreeSet<usize> = BTreeSet::new();

    for (_, mut group) in groups {
        group.sort_by(|a, b| records[*a].timestamp.total_cmp(&records[*b].timestamp));

        let mut window: Vec<usize> = Vec::new();
        for idx in group {
            match window.last() {
                // Gap to the immediately preceding record, not the window start
                Some(&prev)
                    if records[idx].timestamp - records[prev].timestamp <= interval_secs =>
                {
                    window.push(idx);
                    if window.len() >= threshold {
                        fired.extend(window.iter().copied());
                    }
                }
                Some(_) => {
                    window.clear();
                    window.push(idx);
                }
                None => window.push(idx),
            }
        }
    }

    for idx in fired {
        annotate(&mut records[idx], rule, None);
    }
}

// ============================================================================
// TESTS
// ============================================================================
