//! Annotator
//!
//! Merges a fired rule's provenance into a record under the
//! severity-ranked override policy.

use crate::constants::RULE_NAME_SEP;
use crate::logic::capture::CanRecord;

use super::config::{RuleSpec, Severity};

/// Context evidence attached when a context rule fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextObservation {
    pub pgn: u32,
    pub value: f64,
}

/// Merge one fired rule into a record.
///
/// The rule name always accumulates, pipe-separated, in arrival order.
/// Label and the remaining provenance fields are overwritten only when the
/// new severity rank is at least the current one; equal ranks favor the
/// newer rule so later, more specific rules can refine earlier general
/// ones. Context evidence is recorded regardless of the rank outcome.
pub fn annotate(record: &mut CanRecord, rule: &RuleSpec, context: Option<ContextObservation>) {
    if record.rule_name.is_empty() {
        record.rule_name = rule.name.clone();
    } else {
        record.rule_name.push(RULE_NAME_SEP);
        record.rule_name.push_str(&rule.name);
    }

    let current_rank = Severity::rank_of(&record.rule_severity);
    let new_rank = rule.severity_rank();

    if new_rank >= current_rank {
        record.label = rule.label.clone();
        record.rule_type = rule.kind.kind_str().to_string();
        record.semantics = rule.semantics.trim().to_string();
        record.rule_severity = rule.metadata.severity.trim().to_lowercase();
        record.rule_layer = rule.metadata.layer.clone();
        record.rule_description = rule.metadata.description.clone();
    }

    if let Some(ctx) = context {
        record.context_value = Some(ctx.value);
        record.context_pgn = ctx.pgn.to_string();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NORMAL_LABEL;
    use crate::logic::capture::decode_line;
    use crate::logic::rules::config::{RuleKind, RuleMeta};
    use crate::logic::rules::filter::MessageFilter;

    fn rule(name: &str, severity: &str, description: &str) -> RuleSpec {
        RuleSpec {
            name: name.to_string(),
            label: "anomalous".to_string(),
            semantics: "usage".to_string(),
            metadata: RuleMeta {
                severity: severity.to_string(),
                layer: "network".to_string(),
                description: description.to_string(),
            },
            kind: RuleKind::Scope { moi: MessageFilter::default() },
        }
    }

    fn record() -> CanRecord {
        decode_line("(1.0) can0 18FEF100 [0]").unwrap()
    }

    #[test]
    fn test_names_accumulate_in_order() {
        let mut r = record();
        annotate(&mut r, &rule("a", "low", ""), None);
        annotate(&mut r, &rule("b", "low", ""), None);
        annotate(&mut r, &rule("a", "low", ""), None);
        assert_eq!(r.rule_name, "a|b|a");
    }

    #[test]
    fn test_higher_severity_overrides() {
        let mut r = record();
        annotate(&mut r, &rule("weak", "low", "first"), None);
        annotate(&mut r, &rule("strong", "high", "second"), None);
        assert_eq!(r.rule_severity, "high");
        assert_eq!(r.rule_description, "second");
    }

    #[test]
    fn test_lower_severity_does_not_override() {
        let mut r = record();
        annotate(&mut r, &rule("strong", "high", "first"), None);
        annotate(&mut r, &rule("weak", "low", "second"), None);
        assert_eq!(r.rule_severity, "high");
        assert_eq!(r.rule_description, "first");
        // but the name still accumulated
        assert_eq!(r.rule_name, "strong|weak");
    }

    #[test]
    fn test_equal_rank_favors_newest() {
        let mut r = record();
        annotate(&mut r, &rule("first", "medium", "general"), None);
        annotate(&mut r, &rule("second", "medium", "specific"), None);
        assert_eq!(r.rule_description, "specific");
    }

    #[test]
    fn test_unranked_severity_still_overrides_fresh_record() {
        // A fresh record has rank -1, so an unranked rule (-1) still wins
        let mut r = record();
        assert_eq!(r.label, NORMAL_LABEL);
        annotate(&mut r, &rule("odd", "whatever", "d"), None);
        assert_eq!(r.label, "anomalous");
        assert_eq!(r.rule_severity, "whatever");
    }

    #[test]
    fn test_context_recorded_even_when_outranked() {
        let mut r = record();
        annotate(&mut r, &rule("strong", "high", "keeps label"), None);
        annotate(
            &mut r,
            &rule("ctx", "low", "loses rank"),
            Some(ContextObservation { pgn: 65265, value: 12.5 }),
        );
        // Label provenance still belongs to the high rule
        assert_eq!(r.rule_description, "keeps label");
        // Evidence is attached anyway
        assert_eq!(r.context_value, Some(12.5));
        assert_eq!(r.context_pgn, "65265");
    }
}
