// file: src/segmenter/mod.rs
// description: splits a free-text report into a fixed number of sections
// reference: internal module structure

pub mod delimiter;
pub mod numeric;
pub mod patterns;

pub use delimiter::split_on_delimiters;
pub use numeric::split_on_numeric_prefixes;

use crate::config::SegmentationConfig;
use crate::models::{DEFAULT_PLACEHOLDER, SectionSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStrategy {
    /// `===SECTION N===` marker lines.
    #[default]
    Delimiter,
    /// First `N.` occurrence per section. Fragile on arbitrary text.
    NumericPrefix,
    /// Delimiters, or numeric prefixes when the text has no marker line.
    Auto,
}

#[derive(Debug, Clone)]
pub struct Segmenter {
    strategy: SegmentStrategy,
    count: usize,
    placeholder: String,
}

impl Segmenter {
    pub fn new(strategy: SegmentStrategy, count: usize, placeholder: impl Into<String>) -> Self {
        Self {
            strategy,
            count,
            placeholder: placeholder.into(),
        }
    }

    pub fn from_config(config: &SegmentationConfig) -> Self {
        Self::new(config.strategy, config.section_count, config.placeholder.clone())
    }

    pub fn with_strategy(mut self, strategy: SegmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Never fails; sections that cannot be located keep the placeholder.
    pub fn segment(&self, text: &str) -> SectionSet {
        let mut sections = SectionSet::new(self.count, &self.placeholder);

        let stored = match self.strategy {
            SegmentStrategy::Delimiter => split_on_delimiters(text, &mut sections),
            SegmentStrategy::NumericPrefix => split_on_numeric_prefixes(text, &mut sections),
            SegmentStrategy::Auto => {
                if patterns::has_delimiter(text) {
                    split_on_delimiters(text, &mut sections)
                } else {
                    debug!("No delimiter lines found, falling back to numeric prefixes");
                    split_on_numeric_prefixes(text, &mut sections)
                }
            }
        };

        if stored < self.count {
            warn!(
                "Located {} of {} sections ({:?} strategy)",
                stored, self.count, self.strategy
            );
        }

        sections
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(
            SegmentStrategy::Delimiter,
            crate::models::DEFAULT_SECTION_COUNT,
            DEFAULT_PLACEHOLDER,
        )
    }
}

/// Delimiter strategy with the default placeholder.
pub fn segment(text: &str, count: usize) -> SectionSet {
    Segmenter::new(SegmentStrategy::Delimiter, count, DEFAULT_PLACEHOLDER).segment(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_text_is_all_placeholders() {
        let sections = segment("", 6);
        assert_eq!(sections.len(), 6);
        assert!(sections.iter().all(|s| s.body == DEFAULT_PLACEHOLDER && !s.found));
    }

    #[test]
    fn test_two_markers_scenario() {
        let sections = segment("===SECTION 1===\nHello\n===SECTION 2===\nWorld", 6);

        assert_eq!(sections.get(1), Some("Hello"));
        assert_eq!(sections.get(2), Some("World"));
        for n in 3..=6 {
            assert_eq!(sections.get(n), Some(DEFAULT_PLACEHOLDER));
        }
    }

    #[test]
    fn test_odd_markers_only() {
        let text = "===SECTION 1===\none\n\n===SECTION 3===\n three \n===SECTION 5===\nfive\n";
        let sections = segment(text, 6);

        let bodies: Vec<_> = sections.iter().map(|s| s.body.as_str()).collect();
        assert_eq!(
            bodies,
            vec![
                "one",
                DEFAULT_PLACEHOLDER,
                "three",
                DEFAULT_PLACEHOLDER,
                "five",
                DEFAULT_PLACEHOLDER
            ]
        );
    }

    #[test]
    fn test_all_markers_keep_order() {
        let text = (1..=6)
            .map(|n| format!("===SECTION {n}===\npart {n}\n\n"))
            .collect::<String>();
        let sections = segment(&text, 6);

        assert_eq!(sections.found_count(), 6);
        let joined: Vec<_> = sections.iter().map(|s| s.body.clone()).collect();
        assert_eq!(
            joined,
            (1..=6).map(|n| format!("part {n}")).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_delimiter_strategy_ignores_numeric_headings() {
        let sections = segment("1. Core\n2. Devices", 6);
        assert_eq!(sections.found_count(), 0);
    }

    #[test]
    fn test_auto_falls_back_to_numeric() {
        let segmenter = Segmenter::default().with_strategy(SegmentStrategy::Auto);

        let numeric = segmenter.segment("1. Core\n2. Devices");
        assert_eq!(numeric.get(1), Some("Core"));
        assert_eq!(numeric.get(2), Some("Devices"));

        let delimited = segmenter.segment("===SECTION 2===\nOnly two, costs 1.5k");
        assert_eq!(delimited.get(2), Some("Only two, costs 1.5k"));
        assert!(!delimited.is_found(1));
    }

    #[test]
    fn test_custom_count_and_placeholder() {
        let segmenter = Segmenter::new(SegmentStrategy::Delimiter, 3, "-");
        let sections = segmenter.segment("===SECTION 3===\nc\n===SECTION 4===\nd");

        assert_eq!(sections.len(), 3);
        assert_eq!(sections.get(1), Some("-"));
        assert_eq!(sections.get(3), Some("c"));
    }
}
