// file: src/models/document.rs
// description: source document model with kind detection and content hashing
// reference: internal data structures

use crate::error::{AnalysisError, Result};
use crate::utils::Validator;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The closed set of document layouts a table can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    /// Workbook formats read through calamine (xlsx, xls, xlsb, ods).
    TabularBinary,
    /// Comma separated text with a header line.
    DelimitedText,
    /// Word processing document whose tables carry the records.
    RichTextWithTables,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(DocumentKind::TabularBinary),
            "csv" => Ok(DocumentKind::DelimitedText),
            "docx" => Ok(DocumentKind::RichTextWithTables),
            _ => Err(AnalysisError::format(format!(
                "unsupported file type for {}",
                path.display()
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::TabularBinary => "tabular-binary",
            DocumentKind::DelimitedText => "delimited-text",
            DocumentKind::RichTextWithTables => "rich-text-with-tables",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tabular-binary" | "xlsx" | "xls" => Ok(DocumentKind::TabularBinary),
            "delimited-text" | "csv" => Ok(DocumentKind::DelimitedText),
            "rich-text-with-tables" | "docx" => Ok(DocumentKind::RichTextWithTables),
            other => Err(AnalysisError::format(format!(
                "unknown document kind '{}'",
                other
            ))),
        }
    }
}

/// Raw bytes of the support item guide plus its declared kind.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
    pub content_hash: String,
}

impl SourceDocument {
    /// Reads the document from disk, detecting the kind from the extension
    /// unless one is given.
    pub fn load(path: &Path, kind: Option<DocumentKind>) -> Result<Self> {
        Validator::validate_document_path(path)?;

        let kind = match kind {
            Some(kind) => kind,
            None => DocumentKind::from_path(path)?,
        };
        let bytes = fs::read(path)?;

        Ok(Self::from_bytes(path, kind, bytes))
    }

    pub fn from_bytes(path: impl Into<PathBuf>, kind: DocumentKind, bytes: Vec<u8>) -> Self {
        let content_hash = Self::compute_hash(&bytes);
        Self {
            path: path.into(),
            kind,
            bytes,
            content_hash,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn compute_hash(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }
}
