// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: request orchestration

mod orchestrator;
mod progress;

pub use orchestrator::{AnalysisRequest, Analyzer, find_item, load_table};
pub use progress::{ReportSpinner, RequestStats};
