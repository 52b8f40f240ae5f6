//! Rule Configuration
//!
//! Strongly typed rule definitions, validated once at load time.
//! The rule document is YAML with a top-level `rules:` list; entries that
//! fail to deserialize or validate are skipped with a warning so the
//! remaining rules still run.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::ANOMALOUS_LABEL;

use super::filter::MessageFilter;

// ============================================================================
// SEVERITY
// ============================================================================

/// Severity levels recognized by the override policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Severity> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }

    pub fn rank(self) -> i8 {
        match self {
            Severity::Low => 0,
            Severity::Medium => 1,
            Severity::High => 2,
        }
    }

    /// Rank of a free-text severity; unknown or absent strings rank below Low.
    pub fn rank_of(s: &str) -> i8 {
        Severity::parse(s).map(Severity::rank).unwrap_or(-1)
    }
}

// ============================================================================
// COMPARATOR
// ============================================================================

/// Comparison operator for context rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Default for Comparator {
    fn default() -> Self {
        Comparator::Greater
    }
}

impl Comparator {
    pub fn compare(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Greater => value > threshold,
            Comparator::Less => value < threshold,
            Comparator::Equal => value == threshold,
            Comparator::GreaterOrEqual => value >= threshold,
            Comparator::LessOrEqual => value <= threshold,
        }
    }
}

// ============================================================================
// RULE DEFINITIONS
// ============================================================================

/// Free-text rule metadata carried into provenance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleMeta {
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub description: String,
}

/// Context signal descriptor for context rules.
///
/// `offset`/`length` select payload bytes; multi-byte fields are
/// little-endian on the wire and scaled after decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSpec {
    pub pgn: u32,
    #[serde(default)]
    pub sa: Option<u8>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_context_length")]
    pub length: usize,
    #[serde(default = "default_context_scale")]
    pub scale: f64,
    #[serde(default)]
    pub comparator: Comparator,
    #[serde(default)]
    pub threshold: f64,
}

fn default_context_length() -> usize {
    1
}

fn default_context_scale() -> f64 {
    1.0
}

/// The three rule semantics, dispatched by pattern match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleKind {
    /// Content/usage rule: fires on every record matching the filter
    Scope {
        #[serde(default)]
        moi: MessageFilter,
    },
    /// Temporal rule: fires on bursts of closely spaced same-ID frames
    Burst {
        #[serde(default = "default_burst_interval_ms")]
        interval_ms: f64,
        #[serde(default = "default_burst_threshold")]
        threshold: usize,
        #[serde(default)]
        moi: MessageFilter,
    },
    /// State rule: compares against the latest value of another signal
    Context {
        #[serde(default)]
        moi: MessageFilter,
        context: ContextSpec,
    },
}

fn default_burst_interval_ms() -> f64 {
    1.0
}

fn default_burst_threshold() -> usize {
    5
}

impl RuleKind {
    pub fn kind_str(&self) -> &'static str {
        match self {
            RuleKind::Scope { .. } => "scope",
            RuleKind::Burst { .. } => "burst",
            RuleKind::Context { .. } => "context",
        }
    }
}

/// One declarative labeling rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default = "default_rule_label")]
    pub label: String,
    /// Free-text classification: usage | temporal | state
    #[serde(default)]
    pub semantics: String,
    #[serde(default)]
    pub metadata: RuleMeta,
    #[serde(flatten)]
    pub kind: RuleKind,
}

fn default_rule_label() -> String {
    ANOMALOUS_LABEL.to_string()
}

impl RuleSpec {
    pub fn severity_rank(&self) -> i8 {
        Severity::rank_of(&self.metadata.severity)
    }

    /// Load-time validation beyond what serde enforces
    pub fn validate(&self) -> Result<(), String> {
        match &self.kind {
            RuleKind::Context { moi, context } => {
                if moi.pgn.is_none() {
                    return Err("context rule needs a pgn in its moi block".to_string());
                }
                if context.length == 0 {
                    return Err("context length must be at least 1".to_string());
                }
                Ok(())
            }
            RuleKind::Burst { threshold, interval_ms, .. } => {
                if *threshold == 0 {
                    return Err("burst threshold must be at least 1".to_string());
                }
                if !interval_ms.is_finite() || *interval_ms < 0.0 {
                    return Err("burst interval_ms must be non-negative".to_string());
                }
                Ok(())
            }
            RuleKind::Scope { .. } => Ok(()),
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Why the rule document itself could not be loaded (always fatal)
#[derive(Debug)]
pub enum RuleLoadError {
    Io(io::Error),
    Parse(serde_yaml::Error),
}

impl fmt::Display for RuleLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleLoadError::Io(e) => write!(f, "cannot read rule file: {}", e),
            RuleLoadError::Parse(e) => write!(f, "invalid rule file: {}", e),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RuleDocument {
    // Option so a bare `rules:` key (explicit null) still means "no rules"
    #[serde(default)]
    rules: Option<Vec<serde_yaml::Value>>,
}

/// Load the rule list from a YAML file.
///
/// The document being unreadable or not YAML is fatal; individual entries
/// with an unknown `type` or invalid configuration are logged and skipped.
pub fn load_rules(path: &Path) -> Result<Vec<RuleSpec>, RuleLoadError> {
    let text = fs::read_to_string(path).map_err(RuleLoadError::Io)?;
    parse_rules(&text)
}

/// Parse a rule document from YAML text
pub fn parse_rules(text: &str) -> Result<Vec<RuleSpec>, RuleLoadError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let doc: RuleDocument = serde_yaml::from_str(text).map_err(RuleLoadError::Parse)?;
    let entries = doc.rules.unwrap_or_default();

    let mut specs = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let name = entry
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("<unnamed>")
            .to_string();

        match serde_yaml::from_value::<RuleSpec>(entry) {
            Ok(spec) => match spec.validate() {
                Ok(()) => specs.push(spec),
                Err(reason) => log::warn!("Skipping rule '{}': {}", name, reason),
            },
            Err(e) => log::warn!("Skipping rule {} ('{}'): {}", i + 1, name, e),
        }
    }
    Ok(specs)
}

// ============================================================================
// TESTS
// ============================================================================
