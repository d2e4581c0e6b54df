// file: src/models/report.rs
// description: outcome of one analysis request, ready for rendering or export
// reference: internal data structures

use crate::llm::PromptStyle;
use crate::models::{SectionSet, SupportItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelledSection {
    pub index: usize,
    pub label: String,
    pub body: String,
    pub found: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    pub prompt_style: PromptStyle,
    pub document: String,
    pub document_hash: String,
    pub item: SupportItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub sections: Vec<LabelledSection>,
    pub raw_text: String,
}

impl AnalysisReport {
    /// Pairs each section with its tab label; sections past the label list
    /// are labelled by number.
    pub fn label_sections(sections: &SectionSet, labels: &[&str]) -> Vec<LabelledSection> {
        sections
            .iter()
            .map(|section| {
                let label = labels
                    .get(section.index - 1)
                    .map(|l| format!("{}. {}", section.index, l))
                    .unwrap_or_else(|| format!("Section {}", section.index));
                LabelledSection {
                    index: section.index,
                    label,
                    body: section.body.clone(),
                    found: section.found,
                }
            })
            .collect()
    }

    pub fn missing_sections(&self) -> Vec<usize> {
        self.sections
            .iter()
            .filter(|s| !s.found)
            .map(|s| s.index)
            .collect()
    }
}
