// file: src/pipeline/orchestrator.rs
// description: coordinates searches, document summaries, spec extraction and the final report
// reference: single-pass report workflow under a fixed model call budget

use crate::config::{Config, Credentials, PipelineConfig, SummaryMode};
use crate::error::{PipelineError, Result};
use crate::llm::{CompletionBackend, GeminiClient, prompts};
use crate::models::{DocumentSummary, Report};
use crate::pipeline::budget::CallBudget;
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::pipeline::summarizer::Summarizer;
use crate::search::{
    FirecrawlClient, NormalizedResult, ScrapeOptions, ScrapeOverrides, SearchBackend,
    SearchResponse, normalize_item,
};
use crate::text::{TextChunker, TextCompressor};
use crate::utils::{OperationTimer, Validator};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub query_search: String,
    pub query_specs: String,
    pub search_limit: usize,
    pub spec_limit: usize,
    pub scrape_options: Option<ScrapeOverrides>,
    pub max_model_calls: usize,
    pub label: Option<String>,
}

impl ReportRequest {
    pub fn new(query_search: impl Into<String>, query_specs: impl Into<String>) -> Self {
        Self {
            query_search: query_search.into(),
            query_specs: query_specs.into(),
            search_limit: 5,
            spec_limit: 3,
            scrape_options: None,
            max_model_calls: 10,
            label: None,
        }
    }

    /// Review and spec-sheet queries for one car, limits taken from config.
    pub fn for_car(car: &str, pipeline: &PipelineConfig) -> Self {
        Self::new(
            format!("{} buy guide", car),
            format!("{} spec sheet carfolio", car),
        )
        .with_limits(pipeline.search_limit, pipeline.spec_limit)
        .with_max_model_calls(pipeline.max_model_calls)
        .with_label(car)
    }

    pub fn with_limits(mut self, search_limit: usize, spec_limit: usize) -> Self {
        self.search_limit = search_limit;
        self.spec_limit = spec_limit;
        self
    }

    pub fn with_max_model_calls(mut self, max_model_calls: usize) -> Self {
        self.max_model_calls = max_model_calls;
        self
    }

    pub fn with_scrape_overrides(mut self, overrides: ScrapeOverrides) -> Self {
        self.scrape_options = Some(overrides);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Name used in the report prompt.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.query_search)
    }
}

struct PlannedDocument {
    result: NormalizedResult,
    calls: usize,
}

pub struct ReportPipeline {
    search: Arc<dyn SearchBackend>,
    completion: Arc<dyn CompletionBackend>,
    scrape_defaults: ScrapeOptions,
    compressor: TextCompressor,
    chunker: TextChunker,
    mode: SummaryMode,
    parallel_workers: usize,
    show_progress: bool,
}

impl ReportPipeline {
    pub fn new(
        search: Arc<dyn SearchBackend>,
        completion: Arc<dyn CompletionBackend>,
        config: &Config,
    ) -> Result<Self> {
        Ok(Self {
            search,
            completion,
            scrape_defaults: config.search.scrape.clone(),
            compressor: TextCompressor::new(config.pipeline.compress_max_chars)?,
            chunker: TextChunker::new(config.pipeline.chunk_max_chars)?,
            mode: config.pipeline.summary_mode,
            parallel_workers: config.pipeline.parallel_workers.max(1),
            show_progress: false,
        })
    }

    /// Pipeline wired to Firecrawl and Gemini.
    pub fn from_config(config: &Config, credentials: Credentials) -> Result<Self> {
        let search = FirecrawlClient::new(&config.search, credentials.firecrawl_api_key)?;
        let completion = GeminiClient::new(&config.llm, credentials.genai_api_key)?;
        info!("Using completion model {}", completion.model());
        Self::new(Arc::new(search), Arc::new(completion), config)
    }

    pub fn with_progress(mut self, visible: bool) -> Self {
        self.show_progress = visible;
        self
    }

    pub async fn search_and_summarize(&self, request: &ReportRequest) -> Result<Report> {
        Validator::validate_query(&request.query_search)?;
        Validator::validate_query(&request.query_specs)?;

        let mut budget = CallBudget::new(request.max_model_calls)?;
        let doc_limit = request.search_limit.min(budget.document_calls());
        let options = self.scrape_defaults.merged(request.scrape_options.as_ref());

        let timer = OperationTimer::new(&format!("report for {}", request.label()));
        info!(
            "Budget: {} model calls, up to {} document summaries ({} mode)",
            budget.max_calls(),
            doc_limit,
            self.mode
        );

        let reviews = if doc_limit > 0 {
            self.search
                .search(&request.query_search, doc_limit, &options)
                .await?
        } else {
            warn!("No model calls left for document summaries, skipping review search");
            SearchResponse::List(Vec::new())
        };

        let spec_hits = if request.spec_limit > 0 {
            self.search
                .search(&request.query_specs, request.spec_limit, &options)
                .await?
        } else {
            SearchResponse::List(Vec::new())
        };
        timer.checkpoint(&format!(
            "search returned {} review and {} spec hits",
            reviews.len(),
            spec_hits.len()
        ));

        let progress = ProgressTracker::new(0, self.show_progress);
        let summarizer = Summarizer::new(
            Arc::clone(&self.completion),
            self.compressor,
            self.chunker,
        );

        let plan = self.plan_documents(&reviews, doc_limit, &mut budget, &summarizer, &progress);
        progress.set_total(plan.len());
        debug!(
            "Planned {} documents using {} of {} document calls",
            plan.len(),
            budget.reserved(),
            budget.document_calls()
        );

        let summaries = self.summarize_documents(&summarizer, plan, &progress).await?;
        timer.checkpoint(&format!("{} document summaries", summaries.len()));

        let spec_documents = collect_spec_documents(&spec_hits, request.spec_limit, &progress);
        let specs = summarizer.extract_specs(&spec_documents).await?;

        progress.set_message("Writing report".to_string());
        info!("Summaries done, writing report");
        let text = summarizer
            .synthesize_report(request.label(), &summaries, &specs)
            .await?;

        progress.finish();
        let stats = progress.get_stats(summarizer.calls_made());
        timer.finish_with_count(stats.model_calls);
        log_final_stats(&stats);

        Ok(Report {
            text,
            summaries,
            specs,
            stats,
        })
    }

    fn plan_documents(
        &self,
        reviews: &SearchResponse,
        doc_limit: usize,
        budget: &mut CallBudget,
        summarizer: &Summarizer,
        progress: &ProgressTracker,
    ) -> Vec<PlannedDocument> {
        let mut plan = Vec::new();

        for item in reviews.items() {
            if plan.len() >= doc_limit {
                break;
            }

            let result = match normalize_item(item) {
                Ok(result) => result,
                Err(e) => {
                    debug!("Skipping review hit: {}", e);
                    progress.inc_skipped();
                    continue;
                }
            };

            let calls = match self.mode {
                SummaryMode::Single => 1,
                SummaryMode::Chunked => summarizer.chunked_call_cost(&result.markdown),
            };

            if !budget.try_reserve(calls) {
                info!(
                    "Call budget exhausted after {} documents ({} calls left, next needs {})",
                    plan.len(),
                    budget.remaining_document_calls(),
                    calls
                );
                break;
            }

            plan.push(PlannedDocument { result, calls });
        }

        plan
    }

    async fn summarize_documents(
        &self,
        summarizer: &Summarizer,
        plan: Vec<PlannedDocument>,
        progress: &ProgressTracker,
    ) -> Result<Vec<DocumentSummary>> {
        if plan.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.parallel_workers.min(plan.len());
        let mode = self.mode;

        let summarized: Vec<Option<DocumentSummary>> = stream::iter(plan.into_iter().map(
            |doc| async move {
                let url = doc.result.url.as_deref();
                debug!(
                    "Summarizing {} ({} calls)",
                    url.unwrap_or(prompts::UNKNOWN_URL),
                    doc.calls
                );

                let summary = match mode {
                    SummaryMode::Single => {
                        summarizer
                            .summarize_document(&doc.result.markdown, url)
                            .await?
                    }
                    SummaryMode::Chunked => {
                        summarizer
                            .summarize_document_chunked(&doc.result.markdown, url)
                            .await?
                    }
                };

                if summary.trim().is_empty() {
                    warn!(
                        "Empty summary for {}, dropping it",
                        url.unwrap_or(prompts::UNKNOWN_URL)
                    );
                    progress.inc_skipped();
                    return Ok(None);
                }

                progress.inc_summarized();
                Ok::<_, PipelineError>(Some(DocumentSummary::new(doc.result.url, summary)))
            },
        ))
        .buffered(workers)
        .try_collect()
        .await?;

        Ok(summarized.into_iter().flatten().collect())
    }
}

/// `(url, markdown)` for the first `spec_limit` hits that carry content.
fn collect_spec_documents(
    spec_hits: &SearchResponse,
    spec_limit: usize,
    progress: &ProgressTracker,
) -> Vec<(String, String)> {
    let documents: Vec<(String, String)> = spec_hits
        .items()
        .iter()
        .take(spec_limit)
        .filter_map(|item| match normalize_item(item) {
            Ok(result) => Some((
                result.url.unwrap_or_else(|| prompts::UNKNOWN_URL.to_string()),
                result.markdown,
            )),
            Err(e) => {
                debug!("Skipping spec hit: {}", e);
                None
            }
        })
        .collect();

    progress.set_spec_sources(documents.len());
    if documents.is_empty() {
        warn!("No spec sheet content found");
    }
    documents
}

fn log_final_stats(stats: &PipelineStats) {
    info!("=== Report Run Summary ===");
    info!("Duration: {} seconds", stats.duration_secs);
    info!("Documents seen: {}", stats.documents_seen());
    info!("Documents summarized: {}", stats.documents_summarized);
    info!("Documents skipped: {}", stats.documents_skipped);
    info!("Spec sources: {}", stats.spec_sources);
    info!(
        "Model calls: {} ({:.2}s per call)",
        stats.model_calls,
        stats.seconds_per_call()
    );
    info!("==========================");
}
