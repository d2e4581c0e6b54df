// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod report;
pub mod section;
pub mod support_item;
pub mod table;

pub use document::{DocumentKind, SourceDocument};
pub use report::{AnalysisReport, LabelledSection};
pub use section::{DEFAULT_PLACEHOLDER, DEFAULT_SECTION_COUNT, Section, SectionSet};
pub use support_item::SupportItem;
pub use table::{Record, Table};
