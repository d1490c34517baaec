// file: src/utils/validation.rs
// description: input validation for queries, endpoints and local files
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_query(query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Err(PipelineError::Validation(
                "Search query cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            PipelineError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(PipelineError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(PipelineError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    /// Truncate to `max_chars` characters, appending `...` when cut.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_validate_query() {
        tokio_test::assert_ok!(Validator::validate_query("porsche cayman 2007 buy guide"));
        tokio_test::assert_err!(Validator::validate_query(""));
        tokio_test::assert_err!(Validator::validate_query(" \n "));
    }

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://api.firecrawl.dev").is_ok());
        assert!(Validator::validate_url("http://localhost:3002").is_ok());
        assert!(Validator::validate_url("api.firecrawl.dev").is_err());
        assert!(Validator::validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_file_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("review.md");
        fs::write(&file_path, "# Review").unwrap();

        assert!(Validator::validate_file_path(&file_path).is_ok());
        assert!(Validator::validate_file_path(temp.path()).is_err());
        assert!(Validator::validate_file_path(Path::new("/nonexistent/review.md")).is_err());
    }

    #[test]
    fn test_validate_content_not_empty() {
        assert!(Validator::validate_content_not_empty("content").is_ok());
        assert!(Validator::validate_content_not_empty("").is_err());
        assert!(Validator::validate_content_not_empty("   ").is_err());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("Böblingen", 2), "Bö...");
    }
}
