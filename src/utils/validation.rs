// file: src/utils/validation.rs
// description: input validation utilities and helpers
// reference: input validation patterns

use crate::error::{AnalysisError, Result};
use std::path::Path;

pub struct Validator;

impl Validator {
    /// Returns the trimmed code, rejecting blank input.
    pub fn validate_reference_code(code: &str) -> Result<&str> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::Validation(
                "Please enter a valid Support Item Ref No.".to_string(),
            ));
        }
        Ok(trimmed)
    }

    pub fn validate_document_path(path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(AnalysisError::DocumentMissing {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AnalysisError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Cuts on a character boundary at or below `max_length` bytes.
    pub fn truncate_text(text: &str, max_length: usize) -> String {
        if text.len() <= max_length {
            return text.to_string();
        }

        let mut end = max_length;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
