// file: src/pipeline/testing.rs
// description: recording mock backends for pipeline tests
// reference: in-process trait implementations injected in place of HTTP clients

use crate::error::{PipelineError, Result};
use crate::llm::CompletionBackend;
use crate::search::{ScrapeOptions, SearchBackend, SearchResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

/// Arguments captured from a search call
#[derive(Debug, Clone)]
pub struct SearchCall {
    pub query: String,
    pub limit: usize,
    pub options: ScrapeOptions,
}

#[derive(Default)]
pub struct MockSearch {
    responses: Vec<(String, Value)>,
    failure: Option<String>,
    calls: Mutex<Vec<SearchCall>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `response` for queries containing `query_fragment`.
    pub fn with_response(mut self, query_fragment: &str, response: Value) -> Self {
        self.responses.push((query_fragment.to_string(), response));
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for MockSearch {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        options: &ScrapeOptions,
    ) -> Result<SearchResponse> {
        self.calls.lock().unwrap().push(SearchCall {
            query: query.to_string(),
            limit,
            options: options.clone(),
        });

        if let Some(message) = &self.failure {
            return Err(PipelineError::Search(message.clone()));
        }

        let response = self
            .responses
            .iter()
            .find(|(fragment, _)| query.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or(Value::Array(Vec::new()));

        Ok(SearchResponse::from_value(response))
    }
}

pub struct MockCompletion {
    default_response: String,
    rules: Vec<(String, String)>,
    failure: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletion {
    pub fn new(default_response: &str) -> Self {
        Self {
            default_response: default_response.to_string(),
            rules: Vec::new(),
            failure: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answer prompts containing `prompt_fragment` with `response`.
    pub fn with_rule(mut self, prompt_fragment: &str, response: &str) -> Self {
        self.rules
            .push((prompt_fragment.to_string(), response.to_string()));
        self
    }

    /// Fail prompts containing `prompt_fragment`.
    pub fn failing_on(mut self, prompt_fragment: &str) -> Self {
        self.failure = Some(prompt_fragment.to_string());
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn count_matching(&self, prompt_fragment: &str) -> usize {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains(prompt_fragment))
            .count()
    }
}

#[async_trait]
impl CompletionBackend for MockCompletion {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(fragment) = &self.failure
            && prompt.contains(fragment.as_str())
        {
            return Err(PipelineError::Completion("mock completion failure".to_string()));
        }

        Ok(self
            .rules
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.clone()))
    }
}
