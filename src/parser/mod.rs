// file: src/parser/mod.rs
// description: record extraction from the supported document kinds
// reference: internal module structure

pub mod delimited;
pub mod spreadsheet;
pub mod word;

pub use delimited::DelimitedParser;
pub use spreadsheet::SpreadsheetParser;
pub use word::WordTableParser;

use crate::config::DocumentConfig;
use crate::error::{AnalysisError, Result};
use crate::models::{DocumentKind, SourceDocument, Table};
use tracing::info;

/// Turns a source document into a table of records, picking the parser
/// from the document kind.
pub struct RecordExtractor {
    required_headers: Vec<String>,
}

impl RecordExtractor {
    pub fn new(required_headers: Vec<String>) -> Self {
        Self { required_headers }
    }

    pub fn from_config(config: &DocumentConfig) -> Self {
        Self::new(config.required_headers.clone())
    }

    pub fn extract(&self, document: &SourceDocument) -> Result<Table> {
        let table = match document.kind {
            DocumentKind::TabularBinary => SpreadsheetParser::new().parse(&document.bytes)?,
            DocumentKind::DelimitedText => DelimitedParser::new().parse(&document.bytes)?,
            DocumentKind::RichTextWithTables => {
                WordTableParser::new(self.required_headers.clone()).parse(&document.bytes)?
            }
        };

        if table.is_empty() {
            return Err(AnalysisError::format(format!(
                "{} contains no records",
                document.file_name()
            )));
        }

        info!(
            "Extracted {} records with {} columns from {} ({})",
            table.len(),
            table.columns.len(),
            document.file_name(),
            document.kind
        );
        Ok(table)
    }
}
