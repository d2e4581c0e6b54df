// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Document not found at `{}`", path.display())]
    DocumentMissing { path: PathBuf },

    #[error("Could not parse the document: {0}")]
    UnrecognizedFormat(String),

    #[error("Ref No. '{0}' not found")]
    NotFound(String),

    #[error("Model call failed: {0}")]
    ExternalCallFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Name of the request stage that produced the error.
    pub fn stage(&self) -> &'static str {
        match self {
            AnalysisError::Config(_) => "configuration",
            AnalysisError::DocumentMissing { .. } => "document load",
            AnalysisError::UnrecognizedFormat(_) => "record extraction",
            AnalysisError::NotFound(_) => "reference lookup",
            AnalysisError::ExternalCallFailed(_) => "report generation",
            AnalysisError::Validation(_) => "input validation",
            AnalysisError::Io(_) => "io",
            AnalysisError::Serialization(_) => "serialization",
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        AnalysisError::UnrecognizedFormat(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(
            AnalysisError::NotFound("X".to_string()).stage(),
            "reference lookup"
        );
        assert_eq!(
            AnalysisError::ExternalCallFailed("boom".to_string()).stage(),
            "report generation"
        );
    }

    #[test]
    fn test_display_messages() {
        let missing = AnalysisError::DocumentMissing {
            path: PathBuf::from("data/support_items.docx"),
        };
        assert_eq!(
            missing.to_string(),
            "Document not found at `data/support_items.docx`"
        );
        assert_eq!(
            AnalysisError::NotFound("ABC".to_string()).to_string(),
            "Ref No. 'ABC' not found"
        );
    }
}
