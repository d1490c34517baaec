// file: src/search/firecrawl.rs
// description: Firecrawl search API client returning classified search responses
// reference: https://docs.firecrawl.dev/api-reference/endpoint/search

use super::{ScrapeLocation, ScrapeOptions, SearchBackend, SearchResponse};
use crate::config::SearchConfig;
use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FirecrawlSearchRequest<'a> {
    query: &'a str,
    limit: usize,
    scrape_options: FirecrawlScrapeOptions<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FirecrawlScrapeOptions<'a> {
    formats: &'a [String],
    only_main_content: bool,
    timeout: u64,
    location: &'a ScrapeLocation,
    parsers: &'a [String],
}

impl<'a> FirecrawlSearchRequest<'a> {
    fn new(query: &'a str, limit: usize, options: &'a ScrapeOptions) -> Self {
        Self {
            query,
            limit,
            scrape_options: FirecrawlScrapeOptions {
                formats: &options.formats,
                only_main_content: options.only_main_content,
                timeout: options.timeout,
                location: &options.location,
                parsers: &options.parsers,
            },
        }
    }
}

pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl FirecrawlClient {
    pub fn new(config: &SearchConfig, api_key: String) -> Result<Self> {
        Validator::validate_url(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/v2/search", config.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl SearchBackend for FirecrawlClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        options: &ScrapeOptions,
    ) -> Result<SearchResponse> {
        let request = FirecrawlSearchRequest::new(query, limit, options);

        debug!("Requesting Firecrawl search '{}' (limit {})", query, limit);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Search(format!("Failed to send Firecrawl request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::Search(format!(
                "Firecrawl search failed with status {}: {}",
                status, error_text
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            PipelineError::Search(format!("Failed to parse Firecrawl response: {}", e))
        })?;

        check_success_flag(&body)?;

        let classified = SearchResponse::from_value(body);
        debug!(
            "Firecrawl returned {} hits ({} shape)",
            classified.len(),
            classified.shape()
        );
        Ok(classified)
    }
}

fn check_success_flag(body: &Value) -> Result<()> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("no error message");
        return Err(PipelineError::Search(format!(
            "Firecrawl reported failure: {}",
            message
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    #[test]
    fn test_request_uses_camel_case_wire_format() {
        let options = ScrapeOptions::default();
        let request = FirecrawlSearchRequest::new("porsche cayman 2007 buy guide", 4, &options);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "query": "porsche cayman 2007 buy guide",
                "limit": 4,
                "scrapeOptions": {
                    "formats": ["markdown", "links"],
                    "onlyMainContent": true,
                    "timeout": 120000,
                    "location": {"languages": ["en"]},
                    "parsers": []
                }
            })
        );
    }

    #[test]
    fn test_success_flag() {
        assert!(check_success_flag(&json!({"success": true, "data": []})).is_ok());
        assert!(check_success_flag(&json!([])).is_ok());

        let err = check_success_flag(&json!({"success": false, "error": "quota"})).unwrap_err();
        assert!(err.to_string().contains("quota"));
    }

    #[test]
    fn test_client_endpoint() {
        let mut config = Config::default_config().search;
        config.base_url = "https://firecrawl.internal/".to_string();
        let client = FirecrawlClient::new(&config, "fc-key".to_string()).unwrap();
        assert_eq!(client.endpoint, "https://firecrawl.internal/v2/search");

        config.base_url = "firecrawl.internal".to_string();
        assert!(FirecrawlClient::new(&config, "fc-key".to_string()).is_err());
    }
}
