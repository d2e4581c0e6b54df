// file: src/exporter/mod.rs
// description: report and record output

pub mod json;
pub mod terminal;

pub use json::{ExportManifest, JsonExporter};
pub use terminal::{render_item, render_report};
