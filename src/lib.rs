// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod llm;
pub mod lookup;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod segmenter;
pub mod utils;

pub use config::{Config, Credentials, DocumentConfig, FieldNames, LlmConfig, SegmentationConfig};
pub use error::{AnalysisError, Result};
pub use exporter::{ExportManifest, JsonExporter, render_item, render_report};
pub use llm::{OpenAiClient, PromptStyle, ReportGenerator};
pub use lookup::lookup;
pub use models::{
    AnalysisReport, DocumentKind, LabelledSection, Record, Section, SectionSet, SourceDocument,
    SupportItem, Table,
};
pub use parser::RecordExtractor;
pub use pipeline::{AnalysisRequest, Analyzer, ReportSpinner, RequestStats, find_item, load_table};
pub use segmenter::{SegmentStrategy, Segmenter, segment};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let sections = segment("===SECTION 1===\nok", config.segmentation.section_count);
        assert_eq!(sections.found_count(), 1);
    }
}
