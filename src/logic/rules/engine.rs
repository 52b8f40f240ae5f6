//! Rule Engine
//!
//! CHỈ chứa dispatch - mỗi evaluator nằm trong module riêng.
//! Rules run strictly in list order; order breaks severity ties.

use crate::logic::capture::CanRecord;

use super::burst::apply_burst;
use super::config::{RuleKind, RuleSpec};
use super::context::apply_context;
use super::scope::apply_scope;

/// Apply every rule to the record store, in declared order
pub fn apply_rules(records: &mut [CanRecord], rules: &[RuleSpec]) {
    for rule in rules {
        log::info!("Applying rule: {} ({})", rule.name, rule.kind.kind_str());
        match &rule.kind {
            RuleKind::Scope { moi } => apply_scope(records, rule, moi),
            RuleKind::Burst { interval_ms, threshold, moi } => {
                apply_burst(records, rule, *interval_ms, *threshold, moi)
            }
            RuleKind::Context { moi, context } => apply_context(records, rule, moi, context),
        }
    }
}
