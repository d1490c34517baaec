// file: src/llm/gemini.rs
// description: Gemini generateContent client for single-turn text completion
// reference: https://ai.google.dev/api/generate-content

use super::CompletionBackend;
use crate::config::LlmConfig;
use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        Validator::validate_url(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(
            "Requesting completion from {} for {} chars",
            self.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                PipelineError::Completion(format!("Failed to send Gemini request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Completion(format!(
                "Gemini request failed with status {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(|e| {
            PipelineError::Completion(format!("Failed to read Gemini response: {}", e))
        })?;

        Ok(response_text(&body))
    }
}

/// Joined text parts of the first candidate, or the raw body when the
/// response carries no text (e.g. a safety block).
fn response_text(body: &str) -> String {
    let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap_or_default();

    let text: Option<String> = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.is_empty());

    text.unwrap_or_else(|| {
        warn!("Gemini response carried no text, returning raw body");
        body.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    #[test]
    fn test_response_text_joins_parts() {
        let body = json!({
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Brand: "}, {"text": "Porsche"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        })
        .to_string();

        assert_eq!(response_text(&body), "Brand: Porsche");
    }

    #[test]
    fn test_response_text_falls_back_to_body() {
        let blocked = json!({"promptFeedback": {"blockReason": "SAFETY"}}).to_string();
        assert_eq!(response_text(&blocked), blocked);
        assert_eq!(response_text("not json"), "not json");
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contents": [{"role": "user", "parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_endpoint_includes_model() {
        let config = Config::default_config().llm;
        let client = GeminiClient::new(&config, "g-key".to_string()).unwrap();
        assert_eq!(client.model(), "gemini-2.5-flash");
        assert_eq!(
            client.endpoint,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
