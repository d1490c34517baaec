// file: src/models/summary.rs
// description: per-document summary produced by one summarization pass
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Source page, when the search backend reported one.
    pub url: Option<String>,
    pub summary: String,
}

impl DocumentSummary {
    pub fn new(url: Option<String>, summary: String) -> Self {
        Self { url, summary }
    }
}
