// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod budget;
mod orchestrator;
mod progress;
mod summarizer;

#[cfg(test)]
pub(crate) mod testing;

pub use budget::{CallBudget, RESERVED_CALLS};
pub use orchestrator::{ReportPipeline, ReportRequest};
pub use progress::{PipelineStats, ProgressTracker};
pub use summarizer::Summarizer;
