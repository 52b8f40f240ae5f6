//! Logic Module - Decoding & Labeling Engines
//!
//! - `capture/` - frame decoding and the in-memory record store
//! - `rules/` - declarative rule engine (scope, burst, context)
//! - `dataset/` - labeled CSV output

pub mod capture;
pub mod dataset;
pub mod rules;
