// file: src/pipeline/orchestrator.rs
// description: end-to-end analysis of one support item reference
// reference: stage order is validate, load, extract, lookup, generate, segment

use crate::config::{Config, DocumentConfig};
use crate::error::Result;
use crate::llm::{PromptStyle, ReportGenerator, user_prompt};
use crate::lookup::lookup;
use crate::models::{AnalysisReport, DocumentKind, SourceDocument, SupportItem, Table};
use crate::parser::RecordExtractor;
use crate::pipeline::progress::{ReportSpinner, RequestStats};
use crate::segmenter::{SegmentStrategy, Segmenter};
use crate::utils::{OperationTimer, Validator};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const SLOW_GENERATION: Duration = Duration::from_secs(60);
const SPINNER_MESSAGE: &str = "Generating market analysis, will be with you soon...";

/// One user request. Overrides fall back to the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub ref_code: String,
    pub context: Option<String>,
    pub document: Option<PathBuf>,
    pub kind: Option<DocumentKind>,
    pub strategy: Option<SegmentStrategy>,
    pub prompt_style: Option<PromptStyle>,
}

impl AnalysisRequest {
    pub fn new(ref_code: impl Into<String>) -> Self {
        Self {
            ref_code: ref_code.into(),
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }
}

/// Reads the guide and extracts its records.
pub fn load_table(
    config: &DocumentConfig,
    path: Option<&Path>,
    kind: Option<DocumentKind>,
) -> Result<(SourceDocument, Table)> {
    let path = path.unwrap_or(&config.path);
    debug!("Reading support item guide from {}", path.display());

    let document = SourceDocument::load(path, kind.or(config.kind))?;
    let table = RecordExtractor::from_config(config).extract(&document)?;
    Ok((document, table))
}

/// Lookup without a model call.
pub fn find_item(
    config: &DocumentConfig,
    ref_code: &str,
    path: Option<&Path>,
    kind: Option<DocumentKind>,
) -> Result<SupportItem> {
    let ref_code = Validator::validate_reference_code(ref_code)?;
    let (_, table) = load_table(config, path, kind)?;
    let record = lookup(&table, &config.fields.key, ref_code)?;
    Ok(SupportItem::from_record(record, &config.fields))
}

pub struct Analyzer<G> {
    config: Config,
    generator: G,
    show_progress: bool,
}

impl<G: ReportGenerator> Analyzer<G> {
    pub fn new(config: Config, generator: G) -> Self {
        Self {
            config,
            generator,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        let (report, _) = self.run_with_stats(request).await?;
        Ok(report)
    }

    pub async fn run_with_stats(
        &self,
        request: &AnalysisRequest,
    ) -> Result<(AnalysisReport, RequestStats)> {
        let mut stats = RequestStats::new(self.config.segmentation.section_count);
        let ref_code = Validator::validate_reference_code(&request.ref_code)?;
        let style = request
            .prompt_style
            .unwrap_or(self.config.llm.prompt_style);

        info!("Analyzing support item '{}'", ref_code);

        let timer = OperationTimer::new("load document");
        let (document, table) = load_table(
            &self.config.document,
            request.document.as_deref(),
            request.kind,
        )?;
        stats.records_scanned = table.len();
        stats.record_stage("load", timer.finish());

        let timer = OperationTimer::new("lookup");
        let record = lookup(&table, &self.config.document.fields.key, ref_code)?;
        let item = SupportItem::from_record(record, &self.config.document.fields);
        stats.record_stage("lookup", timer.finish());

        let context = request
            .context
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let user = user_prompt(&item, context.as_deref());

        let timer = OperationTimer::new("generate");
        let spinner = ReportSpinner::new(SPINNER_MESSAGE, self.show_progress);
        let generated = self.generator.generate(style.system_prompt(), &user).await;
        spinner.finish();
        timer.warn_if_slow(SLOW_GENERATION);
        let raw_text = generated?;
        debug!("Model reply: {}", Validator::truncate_text(&raw_text, 240));
        stats.record_stage("generate", timer.finish());

        let timer = OperationTimer::new("segment");
        let mut segmenter = Segmenter::from_config(&self.config.segmentation);
        if let Some(strategy) = request.strategy {
            segmenter = segmenter.with_strategy(strategy);
        }
        let sections = segmenter.segment(&raw_text);
        stats.sections_found = sections.found_count();
        stats.record_stage("segment", timer.finish());

        let report = AnalysisReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            model: self.generator.model_name().to_string(),
            prompt_style: style,
            document: document.path.display().to_string(),
            document_hash: document.content_hash.clone(),
            item,
            context,
            sections: AnalysisReport::label_sections(&sections, style.section_labels()),
            raw_text,
        };

        info!("Report {} ready: {}", report.id, stats.summary());
        Ok((report, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::parser::word::fixtures::{docx, table};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const HEADER: &[&str] = &["Support Item Ref No.", "Support Item", "Description"];

    struct StubGenerator {
        reply: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubGenerator {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl ReportGenerator for StubGenerator {
        async fn generate(&self, _system_prompt: &str, user_prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(user_prompt.to_string());
            self.reply
                .clone()
                .map_err(AnalysisError::ExternalCallFailed)
        }

        fn model_name(&self) -> &str {
            "stub-model"
        }
    }

    fn guide(dir: &TempDir) -> Config {
        let path = dir.path().join("support_items.docx");
        let bytes = docx(&table(&[
            HEADER,
            &["05_221803111_0113_1_2", "Walker", "Four wheeled walking frame"],
            &["05_123306111_0103_1_2", "Shower chair", "Mobile shower commode"],
        ]));
        std::fs::write(&path, bytes).unwrap();

        let mut config = Config::default_config();
        config.document.path = path;
        config
    }

    #[tokio::test]
    async fn test_run_produces_labelled_report() {
        let dir = TempDir::new().unwrap();
        let generator = StubGenerator::replying(
            "===SECTION 1===\nMobility\n===SECTION 2===\nTypes\n===SECTION 6===\nSources",
        );
        let analyzer = Analyzer::new(guide(&dir), generator);

        let request = AnalysisRequest::new("  05_221803111_0113_1_2 ")
            .with_context(Some("paediatric".to_string()));
        let (report, stats) = analyzer.run_with_stats(&request).await.unwrap();

        assert_eq!(report.item.display_name, "Walker");
        assert_eq!(report.model, "stub-model");
        assert_eq!(report.context.as_deref(), Some("paediatric"));
        assert_eq!(report.sections.len(), 6);
        assert_eq!(report.sections[0].label, "1. Core Function");
        assert_eq!(report.sections[0].body, "Mobility");
        assert_eq!(report.sections[2].body, "No content returned.");
        assert_eq!(report.missing_sections(), vec![3, 4, 5]);
        assert_eq!(stats.records_scanned, 2);
        assert_eq!(stats.sections_found, 3);

        let prompts = analyzer.generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Support Item: 'Walker'"));
        assert!(prompts[0].ends_with("Additional context: paediatric"));
    }

    #[tokio::test]
    async fn test_unknown_reference_skips_model_call() {
        let dir = TempDir::new().unwrap();
        let analyzer = Analyzer::new(guide(&dir), StubGenerator::replying("unused"));

        let result = analyzer.run(&AnalysisRequest::new("99_999")).await;

        assert!(matches!(result, Err(AnalysisError::NotFound(code)) if code == "99_999"));
        assert!(analyzer.generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_reference_is_rejected_before_loading() {
        let mut config = Config::default_config();
        config.document.path = PathBuf::from("/nonexistent/guide.docx");
        let analyzer = Analyzer::new(config, StubGenerator::replying("unused"));

        let result = analyzer.run(&AnalysisRequest::new("   ")).await;

        assert!(matches!(result, Err(AnalysisError::Validation(_))));
    }

    #[tokio::test]
    async fn test_missing_document() {
        let mut config = Config::default_config();
        config.document.path = PathBuf::from("/nonexistent/guide.docx");
        let analyzer = Analyzer::new(config, StubGenerator::replying("unused"));

        let result = analyzer.run(&AnalysisRequest::new("05_1")).await;

        assert!(matches!(result, Err(AnalysisError::DocumentMissing { .. })));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let analyzer = Analyzer::new(guide(&dir), StubGenerator::failing("status 500"));

        let result = analyzer
            .run(&AnalysisRequest::new("05_123306111_0103_1_2"))
            .await;

        assert!(matches!(result, Err(AnalysisError::ExternalCallFailed(msg)) if msg == "status 500"));
    }

    #[tokio::test]
    async fn test_numeric_strategy_override() {
        let dir = TempDir::new().unwrap();
        let generator = StubGenerator::replying("1. Purpose\n2. Types\n3. Brands");
        let analyzer = Analyzer::new(guide(&dir), generator);

        let mut request = AnalysisRequest::new("05_221803111_0113_1_2");
        request.strategy = Some(SegmentStrategy::NumericPrefix);
        request.prompt_style = Some(PromptStyle::Clinician);
        let report = analyzer.run(&request).await.unwrap();

        assert_eq!(report.prompt_style, PromptStyle::Clinician);
        assert_eq!(report.sections[0].label, "1. Core Function & Need");
        assert!(report.sections[1].found);
        assert!(!report.sections[3].found);
    }

    #[test]
    fn test_find_item() {
        let dir = TempDir::new().unwrap();
        let config = guide(&dir);

        let item = find_item(&config.document, "05_123306111_0103_1_2", None, None).unwrap();

        assert_eq!(item.display_name, "Shower chair");
        assert_eq!(item.description, "Mobile shower commode");
    }
}
