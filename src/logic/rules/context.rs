//! Context Rule Evaluator
//!
//! State semantics: compares each message-of-interest against the most
//! recently observed value of another group's signal, as of the time of
//! the message (at-or-before, inclusive).

use crate::logic::capture::CanRecord;

use super::annotate::{annotate, ContextObservation};
use super::config::{ContextSpec, RuleSpec};
use super::filter::{select_indices, MessageFilter};

/// Scaled context value from one payload, or None when the payload is too
/// short for the configured slice.
fn extract_value(data: &str, spec: &ContextSpec) -> Option<f64> {
    let bytes = hex::decode(data).ok()?;
    let end = spec.offset.checked_add(spec.length)?;
    if bytes.len() < end {
        return None;
    }

    // Multi-byte context fields are little-endian on the wire
    let mut raw: u64 = 0;
    for &b in bytes[spec.offset..end].iter().rev() {
        raw = (raw << 8) | b as u64;
    }
    Some(raw as f64 * spec.scale)
}

pub fn apply_context(
    records: &mut [CanRecord],
    rule: &RuleSpec,
    moi: &MessageFilter,
    spec: &ContextSpec,
) {
    // Build the context value series, indexed by timestamp
    let mut series: Vec<(f64, f64)> = Vec::new();
    for record in records.iter() {
        if record.pgn != spec.pgn {
            continue;
        }
        if let Some(sa) = spec.sa {
            if record.source != sa {
                continue;
            }
        }
        if let Some(value) = extract_value(&record.data, spec) {
            series.push((record.timestamp, value));
        }
    }

    if series.is_empty() {
        log::warn!("Rule '{}': no context values found for PGN {}", rule.name, spec.pgn);
        return;
    }

    series.sort_by(|a, b| a.0.total_cmp(&b.0));

    for idx in select_indices(records, moi) {
        let ts = records[idx].timestamp;

        // Latest context sample at or before the record
        let pos = series.partition_point(|(t, _)| *t <= ts);
        if pos == 0 {
            continue;
        }
        let (_, value) = series[pos - 1];

        if spec.comparator.compare(value, spec.threshold) {
            annotate(
                &mut records[idx],
                rule,
                Some(ContextObservation { pgn: spec.pgn, value }),
            );
        }
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
    use crate::logic::rules::config::{Comparator, RuleKind, RuleMeta};

    fn context_rule(spec: ContextSpec, moi: MessageFilter) -> RuleSpec {
        RuleSpec {
            name: "ctx".to_string(),
            label: "anomalous".to_string(),
            semantics: "state".to_string(),
            metadata: RuleMeta::default(),
            kind: RuleKind::Context { moi, context: spec },
        }
    }

    fn spec_65265() -> ContextSpec {
        ContextSpec {
            pgn: 65265,
            sa: None,
            offset: 0,
            length: 2,
            scale: 1.0,
            comparator: Comparator::Greater,
            threshold: 5.0,
        }
    }

    #[test]
    fn test_extract_value_little_endian_scaled() {
        let spec = ContextSpec { scale: 0.5, ..spec_65265() };
        // bytes 0x0A 0x01 little-endian -> 0x010A = 266, scaled by 0.5
        assert_eq!(extract_value("0A01", &spec), Some(133.0));
    }

    #[test]
    fn test_extract_value_short_payload() {
        let spec = spec_65265();
        assert_eq!(extract_value("0A", &spec), None);
        assert_eq!(extract_value("", &spec), None);
    }

    #[test]
    fn test_lookup_uses_latest_at_or_before() {
        // Context samples: value 10 at t=1.0, value 40 at t=3.0 (PGN 65265)
        // Message-of-interest at t=2.5 (PGN 65266) must see 10, not 40
        let mut records = vec![
            decode_line("(1.0) can0 18FEF100 [2] 0A 00").unwrap(),
            decode_line("(2.5) can0 18FEF200 [0]").unwrap(),
            decode_line("(3.0) can0 18FEF100 [2] 28 00").unwrap(),
        ];
        let moi = MessageFilter { pgn: Some(65266), ..Default::default() };
        let spec = spec_65265();
        let rule = context_rule(spec.clone(), moi.clone());

        apply_context(&mut records, &rule, &moi, &spec);

        assert_eq!(records[1].label, "anomalous");
        assert_eq!(records[1].context_value, Some(10.0));
        assert_eq!(records[1].context_pgn, "65265");
        // Context frames themselves are untouched
        assert_eq!(records[0].label, NORMAL_LABEL);
        assert_eq!(records[2].label, NORMAL_LABEL);
    }

    #[test]
    fn test_sample_at_same_timestamp_counts() {
        let mut records = vec![
            decode_line("(2.0) can0 18FEF100 [2] 0A 00").unwrap(),
            decode_line("(2.0) can0 18FEF200 [0]").unwrap(),
        ];
        let moi = MessageFilter { pgn: Some(65266), ..Default::default() };
        let spec = spec_65265();
        let rule = context_rule(spec.clone(), moi.clone());

        apply_context(&mut records, &rule, &moi, &spec);
        assert_eq!(records[1].context_value, Some(10.0));
    }

    #[test]
    fn test_no_prior_sample_skips_record() {
        let mut records = vec![
            decode_line("(1.0) can0 18FEF200 [0]").unwrap(),
            decode_line("(2.0) can0 18FEF100 [2] 0A 00").unwrap(),
        ];
        let moi = MessageFilter { pgn: Some(65266), ..Default::default() };
        let spec = spec_65265();
        let rule = context_rule(spec.clone(), moi.clone());

        apply_context(&mut records, &rule, &moi, &spec);
        assert_eq!(records[0].label, NORMAL_LABEL);
        assert_eq!(records[0].context_value, None);
    }

    #[test]
    fn test_comparator_false_does_not_fire() {
        let mut records = vec![
            decode_line("(1.0) can0 18FEF100 [2] 02 00").unwrap(),
            decode_line("(2.0) can0 18FEF200 [0]").unwrap(),
        ];
        let moi = MessageFilter { pgn: Some(65266), ..Default::default() };
        let spec = spec_65265(); // threshold 5.0, value will be 2
        let rule = context_rule(spec.clone(), moi.clone());

        apply_context(&mut records, &rule, &moi, &spec);
        assert_eq!(records[1].label, NORMAL_LABEL);
    }

    #[test]
    fn test_no_samples_is_noop() {
        let mut records = vec![decode_line("(1.0) can0 18FEF200 [0]").unwrap()];
        let moi = MessageFilter { pgn: Some(65266), ..Default::default() };
        let spec = spec_65265();
        let rule = context_rule(spec.clone(), moi.clone());

        apply_context(&mut records, &rule, &moi, &spec);
        assert_eq!(records[0].label, NORMAL_LABEL);
        assert!(records[0].rule_name.is_empty());
    }

    #[test]
    fn test_short_context_payload_skipped_not_fatal() {
        // First sample is too short for a 2-byte slice and is dropped;
        // the second still feeds the series
        let mut records = vec![
            decode_line("(1.0) can0 18FEF100 [1] 0A").unwrap(),
            decode_line("(2.0) can0 18FEF100 [2] 63 00").unwrap(),
            decode_line("(3.0) can0 18FEF200 [0]").unwrap(),
        ];
        let moi = MessageFilter { pgn: Some(65266), ..Default::default() };
        let spec = spec_65265();
        let rule = context_rule(spec.clone(), moi.clone());

        apply_context(&mut records, &rule, &moi, &spec);
        assert_eq!(records[2].context_value, Some(99.0));
    }

    #[test]
    fn test_source_narrowing() {
        // Samples from SA 0x17 must be ignored when the spec pins SA 0x00
        let mut records = vec![
            decode_line("(1.0) can0 18FEF117 [2] FF 00").unwrap(),
            decode_line("(2.0) can0 18FEF100 [2] 0A 00").unwrap(),
            decode_line("(3.0) can0 18FEF200 [0]").unwrap(),
        ];
        let moi = MessageFilter { pgn: Some(65266), ..Default::default() };
        let spec = ContextSpec { sa: Some(0x00), ..spec_65265() };
        let rule = context_rule(spec.clone(), moi.clone());

        apply_context(&mut records, &rule, &moi, &spec);
        assert_eq!(records[2].context_value, Some(10.0));
    }
}
