// file: src/config.rs
// description: application configuration management with toml and env support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::search::ScrapeOptions;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const FIRECRAWL_API_KEY_VAR: &str = "FIRECRAWL_API_KEY";
pub const GENAI_API_KEY_VAR: &str = "GENAI_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub search: SearchConfig,
    pub llm: LlmConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub scrape: ScrapeOptions,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub search_limit: usize,
    pub spec_limit: usize,
    pub max_model_calls: usize,
    pub compress_max_chars: usize,
    pub chunk_max_chars: usize,
    pub summary_mode: SummaryMode,
    pub parallel_workers: usize,
}

/// How a review document is turned into one summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// One call per document over a start/middle/end sample of the text.
    #[default]
    Single,
    /// One call per chunk plus one call to merge the chunk summaries.
    Chunked,
}

impl FromStr for SummaryMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "chunked" => Ok(Self::Chunked),
            other => Err(PipelineError::Config(format!(
                "unknown summary mode '{}' (expected 'single' or 'chunked')",
                other
            ))),
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Chunked => f.write_str("chunked"),
        }
    }
}

/// API keys for the two external backends.
#[derive(Clone)]
pub struct Credentials {
    pub firecrawl_api_key: String,
    pub genai_api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("firecrawl_api_key", &"<redacted>")
            .field("genai_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_sources(firecrawl: Option<String>, genai: Option<String>) -> Result<Self> {
        let firecrawl_api_key = non_empty(firecrawl)
            .ok_or(PipelineError::MissingCredential(FIRECRAWL_API_KEY_VAR))?;
        let genai_api_key =
            non_empty(genai).ok_or(PipelineError::MissingCredential(GENAI_API_KEY_VAR))?;

        Ok(Self {
            firecrawl_api_key,
            genai_api_key,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CAR_CHECKER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            search: SearchConfig {
                base_url: "https://api.firecrawl.dev".to_string(),
                timeout_secs: 180,
                api_key: None,
                scrape: ScrapeOptions::default(),
            },
            llm: LlmConfig {
                base_url: "https://generativelanguage.googleapis.com".to_string(),
                model: crate::llm::DEFAULT_MODEL.to_string(),
                timeout_secs: 120,
                api_key: None,
            },
            pipeline: PipelineConfig {
                search_limit: 5,
                spec_limit: 3,
                max_model_calls: 10,
                compress_max_chars: 20_000,
                chunk_max_chars: 3_000,
                summary_mode: SummaryMode::Single,
                parallel_workers: 1,
            },
        }
    }

    /// Resolve API keys from the config file first, then the process environment.
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::from_sources(
            self.search
                .api_key
                .clone()
                .or_else(|| env::var(FIRECRAWL_API_KEY_VAR).ok()),
            self.llm
                .api_key
                .clone()
                .or_else(|| env::var(GENAI_API_KEY_VAR).ok()),
        )
    }

    /// Search key alone, for commands that never call the model.
    pub fn search_api_key(&self) -> Result<String> {
        non_empty(
            self.search
                .api_key
                .clone()
                .or_else(|| env::var(FIRECRAWL_API_KEY_VAR).ok()),
        )
        .ok_or(PipelineError::MissingCredential(FIRECRAWL_API_KEY_VAR))
    }

    pub fn validate(&self) -> Result<()> {
        if self.pipeline.parallel_workers == 0 {
            return Err(PipelineError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.max_model_calls < crate::pipeline::RESERVED_CALLS {
            return Err(PipelineError::Config(format!(
                "max_model_calls must be at least {}",
                crate::pipeline::RESERVED_CALLS
            )));
        }

        if self.pipeline.compress_max_chars < 3 || self.pipeline.chunk_max_chars == 0 {
            return Err(PipelineError::Config(
                "compress_max_chars must be at least 3 and chunk_max_chars greater than 0"
                    .to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(PipelineError::Config("llm.model must not be empty".to_string()));
        }

        Ok(())
    }
}
