// file: src/pipeline/summarizer.rs
// description: templated completion calls for documents, chunks, spec sheets and the final report
// reference: one prompt per call, raw text responses

use crate::error::Result;
use crate::llm::{CompletionBackend, prompts};
use crate::models::{DocumentSummary, SpecExtraction};
use crate::text::{TextChunker, TextCompressor};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

pub struct Summarizer {
    backend: Arc<dyn CompletionBackend>,
    compressor: TextCompressor,
    chunker: TextChunker,
    calls: AtomicUsize,
}

impl Summarizer {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        compressor: TextCompressor,
        chunker: TextChunker,
    ) -> Self {
        Self {
            backend,
            compressor,
            chunker,
            calls: AtomicUsize::new(0),
        }
    }

    /// Completion calls issued so far.
    pub fn calls_made(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls the chunked mode needs for this document: one per chunk plus the merge.
    pub fn chunked_call_cost(&self, markdown: &str) -> usize {
        self.chunker.chunks(markdown).count() + 1
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.backend.generate(prompt).await
    }

    pub async fn summarize_chunk(&self, chunk: &str) -> Result<String> {
        self.complete(&prompts::chunk_summary(chunk)).await
    }

    pub async fn summarize_document(&self, markdown: &str, url: Option<&str>) -> Result<String> {
        let payload = self.compressor.compress(markdown);
        if payload.chars().count() < markdown.trim().chars().count() {
            debug!(
                "Compressed {} to {} chars",
                url.unwrap_or(prompts::UNKNOWN_URL),
                payload.chars().count()
            );
        }

        self.complete(&prompts::document_summary(&payload, url)).await
    }

    pub async fn summarize_document_chunked(
        &self,
        markdown: &str,
        url: Option<&str>,
    ) -> Result<String> {
        let mut chunk_summaries = Vec::new();
        for chunk in self.chunker.chunks(markdown) {
            chunk_summaries.push(self.summarize_chunk(chunk).await?);
        }

        self.complete(&prompts::combine_chunk_summaries(&chunk_summaries, url))
            .await
    }

    /// One call over all `(url, markdown)` spec documents; no call when empty.
    pub async fn extract_specs(&self, documents: &[(String, String)]) -> Result<SpecExtraction> {
        if documents.is_empty() {
            return Ok(SpecExtraction::NotFound);
        }

        let combined = prompts::render_spec_documents(documents);
        let response = self.complete(&prompts::spec_extraction(&combined)).await?;

        let specs = SpecExtraction::parse(&response);
        if specs.is_raw() {
            warn!("Spec extraction did not return JSON, keeping raw response");
        } else {
            debug!("Extracted {} spec entries", specs.entries().len());
        }
        Ok(specs)
    }

    pub async fn synthesize_report(
        &self,
        label: &str,
        summaries: &[DocumentSummary],
        specs: &SpecExtraction,
    ) -> Result<String> {
        let combined = prompts::render_summaries(summaries);
        let specs_document = specs.to_prompt_document()?;

        self.complete(&prompts::final_report(label, &combined, &specs_document))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::MockCompletion;
    use pretty_assertions::assert_eq;

    fn summarizer(backend: Arc<MockCompletion>, compress: usize, chunk: usize) -> Summarizer {
        Summarizer::new(
            backend,
            TextCompressor::new(compress).unwrap(),
            TextChunker::new(chunk).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_document_summary_compresses_payload() {
        let backend = Arc::new(MockCompletion::new("two paragraphs"));
        let summarizer = summarizer(backend.clone(), 30, 3000);

        let long_doc = "x".repeat(500);
        let summary = summarizer
            .summarize_document(&long_doc, Some("https://a.example"))
            .await
            .unwrap();

        assert_eq!(summary, "two paragraphs");
        assert_eq!(summarizer.calls_made(), 1);

        let prompt = &backend.prompts()[0];
        assert!(prompt.contains("--MIDDLE--"));
        assert!(prompt.contains("Source: https://a.example"));
        assert!(!prompt.contains(&long_doc));
    }

    #[tokio::test]
    async fn test_chunked_summary_uses_one_call_per_chunk_plus_merge() {
        let backend = Arc::new(MockCompletion::new("short"));
        let summarizer = summarizer(backend.clone(), 20_000, 10);

        let doc = "aaaaaaaaaaaaaaaaaaaaaaaaa";
        assert_eq!(summarizer.chunked_call_cost(doc), 4);

        summarizer
            .summarize_document_chunked(doc, None)
            .await
            .unwrap();
        assert_eq!(summarizer.calls_made(), 4);

        let prompts = backend.prompts();
        assert!(prompts[0].starts_with("Summarize this excerpt"));
        assert!(prompts[3].starts_with("Combine these short summaries"));
        assert!(prompts[3].contains("Preserve source attribution at the end: unknown"));
    }

    #[tokio::test]
    async fn test_extract_specs_skips_call_without_documents() {
        let backend = Arc::new(MockCompletion::new("[]"));
        let summarizer = summarizer(backend.clone(), 20_000, 3000);

        let specs = summarizer.extract_specs(&[]).await.unwrap();
        assert_eq!(specs, SpecExtraction::NotFound);
        assert_eq!(summarizer.calls_made(), 0);
    }

    #[tokio::test]
    async fn test_extract_specs_parses_or_wraps() {
        let backend = Arc::new(
            MockCompletion::new("not json")
                .with_rule("Output a JSON array", r#"[{"brand": "Porsche"}]"#),
        );
        let summarizer = summarizer(backend.clone(), 20_000, 3000);
        let docs = vec![("https://spec.example".to_string(), "245 hp".to_string())];

        let specs = summarizer.extract_specs(&docs).await.unwrap();
        assert_eq!(specs.entries()[0].brand.as_deref(), Some("Porsche"));
        assert!(backend.prompts()[0].contains("URL: https://spec.example\n\n245 hp"));

        let raw_backend = Arc::new(MockCompletion::new("not json"));
        let summarizer = summarizer_with(raw_backend);
        let specs = summarizer.extract_specs(&docs).await.unwrap();
        assert_eq!(
            specs,
            SpecExtraction::Raw {
                raw: "not json".to_string()
            }
        );
    }

    fn summarizer_with(backend: Arc<MockCompletion>) -> Summarizer {
        summarizer(backend, 20_000, 3000)
    }

    #[tokio::test]
    async fn test_synthesis_prompt_contains_summaries_and_specs() {
        let backend = Arc::new(MockCompletion::new("Brand: Porsche"));
        let summarizer = summarizer_with(backend.clone());
        let summaries = vec![DocumentSummary::new(
            Some("https://review.example".to_string()),
            "IMS bearing worries.".to_string(),
        )];

        let report = summarizer
            .synthesize_report("porsche cayman 2007", &summaries, &SpecExtraction::NotFound)
            .await
            .unwrap();

        assert_eq!(report, "Brand: Porsche");
        let prompt = &backend.prompts()[0];
        assert!(prompt.contains("From https://review.example:\nIMS bearing worries."));
        assert!(prompt.contains("No specs found."));
    }
}
