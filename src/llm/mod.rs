// file: src/llm/mod.rs
// description: completion backend seam and prompt templates
// reference: https://ai.google.dev/api/generate-content

pub mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

use crate::error::Result;
use async_trait::async_trait;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete a prompt and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
