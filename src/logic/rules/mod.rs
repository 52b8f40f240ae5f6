//! Rules Module - Declarative Labeling Engine
//!
//! Three rule semantics over the decoded record store:
//! - scope: content/usage - every record matching a filter
//! - burst: temporal - clusters of closely spaced same-ID frames
//! - context: state - compare against another signal's latest value

pub mod annotate;
pub mod burst;
pub mod config;
pub mod context;
pub mod engine;
pub mod filter;
pub mod scope;


pub use annotate::{annotate, ContextObservation};
pub use config::{
    load_rules, parse_rules, Comparator, ContextSpec, RuleKind, RuleLoadError, RuleMeta,
    RuleSpec, Severity,
};
pub use engine::apply_rules;
pub use filter::{select_indices, MessageFilter};
