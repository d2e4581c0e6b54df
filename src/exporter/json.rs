// file: src/exporter/json.rs
// description: json export of analysis reports and extracted guide records

use crate::error::Result;
use crate::models::{AnalysisReport, Record, SourceDocument, Table};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct ExportedTable<'a> {
    source: String,
    content_hash: &'a str,
    columns: &'a [String],
    records: &'a [Record],
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub source: String,
    pub total_records: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>, pretty: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir, pretty })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn export_report(&self, report: &AnalysisReport) -> Result<PathBuf> {
        let file_name = format!(
            "report_{}_{}.json",
            file_stem(&report.item.reference_code),
            report.generated_at.format("%Y%m%dT%H%M%SZ")
        );
        let path = self.output_dir.join(file_name);
        self.write(&path, report)?;

        info!("Wrote report {} to {}", report.id, path.display());
        Ok(path)
    }

    /// Writes every record plus a manifest next to it.
    pub fn export_table(&self, table: &Table, document: &SourceDocument) -> Result<ExportManifest> {
        info!("Starting JSON export to {:?}", self.output_dir);

        let records_name = format!("{}.records.json", file_stem(&document.file_name()));
        let exported = ExportedTable {
            source: document.path.display().to_string(),
            content_hash: &document.content_hash,
            columns: &table.columns,
            records: &table.records,
        };
        self.write(&self.output_dir.join(&records_name), &exported)?;

        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            source: document.path.display().to_string(),
            total_records: table.len(),
            files: vec![records_name],
        };
        self.write(&self.output_dir.join("manifest.json"), &manifest)?;

        info!("Export complete: {} records exported", manifest.total_records);
        Ok(manifest)
    }

    fn write<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        fs::write(path, json)?;
        Ok(())
    }
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "unnamed".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::PromptStyle;
    use crate::models::{DocumentKind, SupportItem};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn sample_table() -> Table {
        let header = vec!["Ref".to_string(), "Name".to_string()];
        let rows = vec![
            vec!["01_1".to_string(), "Walker".to_string()],
            vec!["01_2".to_string(), "Cane".to_string()],
        ];
        Table::from_grid("csv", &header, rows, false).unwrap()
    }

    #[test]
    fn test_exporter_creation() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("out/json");
        let exporter = JsonExporter::new(&nested, false).unwrap();
        assert!(exporter.output_dir().is_dir());
    }

    #[test]
    fn test_export_table_writes_records_and_manifest() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path(), true).unwrap();
        let document =
            SourceDocument::from_bytes("data/guide v2.csv", DocumentKind::DelimitedText, b"x".to_vec());

        let manifest = exporter.export_table(&sample_table(), &document).unwrap();

        assert_eq!(manifest.total_records, 2);
        assert_eq!(manifest.files, vec!["guide_v2.csv.records.json".to_string()]);

        let written = fs::read_to_string(dir.path().join(&manifest.files[0])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["records"][1]["Name"], "Cane");
        assert_eq!(value["columns"][0], "Ref");
        assert!(dir.path().join("manifest.json").is_file());
    }

    #[test]
    fn test_export_report() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path(), false).unwrap();
        let report = AnalysisReport {
            id: uuid::Uuid::new_v4(),
            generated_at: Utc::now(),
            model: "gpt-4o-mini".to_string(),
            prompt_style: PromptStyle::MarketAnalyst,
            document: "guide.docx".to_string(),
            document_hash: "abc".to_string(),
            item: SupportItem {
                reference_code: "05/221 803".to_string(),
                display_name: "Walker".to_string(),
                description: "Frame".to_string(),
                extra: BTreeMap::new(),
            },
            context: None,
            sections: Vec::new(),
            raw_text: "text".to_string(),
        };

        let path = exporter.export_report(&report).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("report_05_221_803_"));
        let back: AnalysisReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.id, report.id);
        assert!(!fs::read_to_string(&path).unwrap().contains("\"context\""));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("  "), "unnamed");
        assert_eq!(file_stem("a/b c"), "a_b_c");
    }
}
