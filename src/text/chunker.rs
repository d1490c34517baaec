// file: src/text/chunker.rs
// description: paragraph-aware character chunking for multi-request summarization
// reference: greedy chunking with paragraph-break cut points

use crate::error::{PipelineError, Result};

const PARAGRAPH_BREAK: &str = "\n\n";

#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    max_chars: usize,
}

impl TextChunker {
    pub fn new(max_chars: usize) -> Result<Self> {
        if max_chars == 0 {
            return Err(PipelineError::Validation(
                "chunk size must be greater than 0".to_string(),
            ));
        }
        Ok(Self { max_chars })
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn chunks<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks {
            remaining: text.trim(),
            max_chars: self.max_chars,
        }
    }
}

/// Iterator over trimmed chunks of at most `max_chars` characters.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    remaining: &'a str,
    max_chars: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }

        let window_end = self
            .remaining
            .char_indices()
            .nth(self.max_chars)
            .map(|(idx, _)| idx)
            .unwrap_or(self.remaining.len());
        let window = &self.remaining[..window_end];

        // cut at the last paragraph break only when it lies past the halfway point
        let cut = match window.rfind(PARAGRAPH_BREAK) {
            Some(pos) if window[..pos].chars().count() > self.max_chars / 2 => pos,
            _ => window_end,
        };

        let chunk = &self.remaining[..cut];
        self.remaining = self.remaining[cut..].trim_start();
        Some(chunk.trim())
    }
}
