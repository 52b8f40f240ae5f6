//! Scope Rule Evaluator
//!
//! Content/usage semantics: every record matching the filter is annotated.
//! No state carried across records.

use crate::logic::capture::CanRecord;

use super::annotate::annotate;
use super::config::RuleSpec;
use super::filter::{select_indices, MessageFilter};

pub fn apply_scope(records: &mut [CanRecord], rule: &RuleSpec, moi: &MessageFilter) {
    let indices = select_indices(records, moi);
    if indices.is_empty() {
        log::debug!("Rule '{}' matched no records", rule.name);
        return;
    }

    for idx in indices {
        annotate(&mut records[idx], rule, None);
    }
}

// ============================================================================
// TESTS
// ============================================================================
