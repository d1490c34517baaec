// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod search;
pub mod text;
pub mod utils;

pub use config::{Config, Credentials, LlmConfig, PipelineConfig, SearchConfig, SummaryMode};
pub use error::{PipelineError, Result};
pub use exporter::{ExportedReport, JsonExporter};
pub use llm::{CompletionBackend, GeminiClient};
pub use models::{DocumentSummary, Report, SpecEntry, SpecExtraction};
pub use pipeline::{
    CallBudget, PipelineStats, ProgressTracker, ReportPipeline, ReportRequest, Summarizer,
};
pub use search::{
    FirecrawlClient, NormalizeError, NormalizedResult, ScrapeOptions, ScrapeOverrides,
    SearchBackend, SearchResponse,
};
pub use text::{TextChunker, TextCompressor};
pub use utils::{OperationTimer, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert!(CallBudget::new(config.pipeline.max_model_calls).is_ok());
        let _request = ReportRequest::for_car("porsche cayman 2007", &config.pipeline);
    }
}
