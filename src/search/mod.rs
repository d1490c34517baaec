// file: src/search/mod.rs
// description: search/scrape backend seam, scrape options and result normalization
// reference: https://docs.firecrawl.dev/api-reference/endpoint/search

pub mod firecrawl;
pub mod normalizer;

pub use firecrawl::FirecrawlClient;
pub use normalizer::{NormalizeError, NormalizedResult, SearchResponse, normalize_item};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Options forwarded to the backend for every scraped search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOptions {
    pub formats: Vec<String>,
    pub only_main_content: bool,
    /// Milliseconds.
    pub timeout: u64,
    pub location: ScrapeLocation,
    /// Empty disables PDF parsing.
    pub parsers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeLocation {
    pub languages: Vec<String>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            formats: vec!["markdown".to_string(), "links".to_string()],
            only_main_content: true,
            timeout: 120_000,
            location: ScrapeLocation {
                languages: vec!["en".to_string()],
            },
            parsers: Vec::new(),
        }
    }
}

/// Caller-supplied overrides; `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOverrides {
    pub formats: Option<Vec<String>>,
    pub only_main_content: Option<bool>,
    pub timeout: Option<u64>,
    pub languages: Option<Vec<String>>,
    pub parsers: Option<Vec<String>>,
}

impl ScrapeOptions {
    pub fn merged(&self, overrides: Option<&ScrapeOverrides>) -> ScrapeOptions {
        let mut merged = self.clone();
        let Some(overrides) = overrides else {
            return merged;
        };

        if let Some(formats) = &overrides.formats {
            merged.formats = formats.clone();
        }
        if let Some(only_main_content) = overrides.only_main_content {
            merged.only_main_content = only_main_content;
        }
        if let Some(timeout) = overrides.timeout {
            merged.timeout = timeout;
        }
        if let Some(languages) = &overrides.languages {
            merged.location.languages = languages.clone();
        }
        if let Some(parsers) = &overrides.parsers {
            merged.parsers = parsers.clone();
        }

        merged
    }
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search and scrape the top `limit` hits.
    async fn search(
        &self,
        query: &str,
        limit: usize,
        options: &ScrapeOptions,
    ) -> Result<SearchResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_without_overrides_keeps_defaults() {
        let defaults = ScrapeOptions::default();
        assert_eq!(defaults.merged(None), defaults);
    }

    #[test]
    fn test_merge_overrides_only_given_fields() {
        let defaults = ScrapeOptions::default();
        let overrides = ScrapeOverrides {
            timeout: Some(30_000),
            languages: Some(vec!["de".to_string()]),
            ..Default::default()
        };

        let merged = defaults.merged(Some(&overrides));
        assert_eq!(merged.timeout, 30_000);
        assert_eq!(merged.location.languages, vec!["de".to_string()]);
        assert_eq!(merged.formats, defaults.formats);
        assert!(merged.only_main_content);
        assert!(merged.parsers.is_empty());
    }
}
