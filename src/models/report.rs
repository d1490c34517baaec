// file: src/models/report.rs
// description: final pipeline output bundling the report text with its inputs
// reference: internal data structures

use super::{DocumentSummary, SpecExtraction};
use crate::pipeline::PipelineStats;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Model-written report following the fixed section template.
    pub text: String,
    pub summaries: Vec<DocumentSummary>,
    pub specs: SpecExtraction,
    pub stats: PipelineStats,
}

impl Report {
    pub fn source_urls(&self) -> Vec<&str> {
        self.summaries
            .iter()
            .filter_map(|s| s.url.as_deref())
            .chain(
                self.specs
                    .entries()
                    .iter()
                    .filter_map(|e| e.source_url.as_deref()),
            )
            .collect()
    }
}
