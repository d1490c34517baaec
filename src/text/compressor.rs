// file: src/text/compressor.rs
// description: reduces long documents to a start/middle/end sample within a character budget
// reference: single-request summarization of oversized documents

use crate::error::{PipelineError, Result};

pub const START_MARKER: &str = "\n\n--START--\n\n";
pub const MIDDLE_MARKER: &str = "\n\n--MIDDLE--\n\n";
pub const END_MARKER: &str = "\n\n--END--\n\n";

#[derive(Debug, Clone, Copy)]
pub struct TextCompressor {
    max_chars: usize,
}

impl TextCompressor {
    pub fn new(max_chars: usize) -> Result<Self> {
        if max_chars < 3 {
            return Err(PipelineError::Validation(format!(
                "compression budget must be at least 3 characters, got {}",
                max_chars
            )));
        }
        Ok(Self { max_chars })
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Characters added by the three markers on top of the budget.
    pub fn separator_overhead() -> usize {
        [START_MARKER, MIDDLE_MARKER, END_MARKER]
            .iter()
            .map(|m| m.chars().count())
            .sum()
    }

    /// Trimmed text if it fits; otherwise three equal slices taken from the
    /// start, around the midpoint and from the end.
    pub fn compress(&self, text: &str) -> String {
        let text = text.trim();
        let len = text.chars().count();
        if len <= self.max_chars {
            return text.to_string();
        }

        let chars: Vec<char> = text.chars().collect();
        let part = self.max_chars / 3;
        let mid = len / 2;

        let start: String = chars[..part].iter().collect();
        let middle: String = chars[mid - part / 2..mid + part / 2].iter().collect();
        let end: String = chars[len - part..].iter().collect();

        let mut out = String::with_capacity(
            start.len() + middle.len() + end.len() + Self::separator_overhead(),
        );
        out.push_str(START_MARKER);
        out.push_str(&start);
        out.push_str(MIDDLE_MARKER);
        out.push_str(&middle);
        out.push_str(END_MARKER);
        out.push_str(&end);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_short_text_returned_trimmed() {
        let compressor = TextCompressor::new(100).unwrap();
        assert_eq!(compressor.compress("  short review \n"), "short review");
        assert_eq!(compressor.compress(""), "");
    }

    #[test]
    fn test_long_text_sampled_within_budget() {
        let compressor = TextCompressor::new(30).unwrap();
        let text: String = ('a'..='z').cycle().take(200).collect();

        let compressed = compressor.compress(&text);
        assert!(compressed.contains("--START--"));
        assert!(compressed.contains("--MIDDLE--"));
        assert!(compressed.contains("--END--"));
        assert!(
            compressed.chars().count() <= 30 + TextCompressor::separator_overhead()
        );

        // start slice is the first part, end slice the last part
        let after_start = compressed.strip_prefix(START_MARKER).unwrap();
        assert!(after_start.starts_with(&text[..10]));
        assert!(compressed.ends_with(&text[190..]));
    }

    #[test]
    fn test_middle_slice_is_centered() {
        let compressor = TextCompressor::new(9).unwrap();
        let text = "0123456789ABCDEFGHIJ";

        let compressed = compressor.compress(text);
        assert_eq!(
            compressed,
            format!("{}012{}9A{}HIJ", START_MARKER, MIDDLE_MARKER, END_MARKER)
        );
    }

    #[test]
    fn test_multibyte_text_does_not_split_chars() {
        let compressor = TextCompressor::new(6).unwrap();
        let text = "ééééééééééüüüüüüüüüü";
        let compressed = compressor.compress(text);
        assert!(compressed.contains("éé"));
        assert!(compressed.ends_with("üü"));
    }

    #[test]
    fn test_rejects_tiny_budget() {
        assert!(TextCompressor::new(2).is_err());
    }
}
