// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod report;
pub mod spec;
pub mod summary;

pub use report::Report;
pub use spec::{SpecEntry, SpecExtraction};
pub use summary::DocumentSummary;
