//! Dataset Module - Labeled Output
//!
//! Writes the final annotated record store as a CSV dataset.

pub mod writer;


pub use writer::write_csv;
