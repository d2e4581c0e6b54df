// file: src/models/section.rs
// description: fixed-size set of numbered report sections
// reference: internal data structures

use serde::{Deserialize, Serialize};

pub const DEFAULT_SECTION_COUNT: usize = 6;
pub const DEFAULT_PLACEHOLDER: &str = "No content returned.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// 1-based position in the report.
    pub index: usize,
    pub body: String,
    /// False while the body is still the placeholder.
    pub found: bool,
}

/// Sections `1..=count`, always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSet {
    sections: Vec<Section>,
}

impl SectionSet {
    pub fn new(count: usize, placeholder: &str) -> Self {
        let sections = (1..=count)
            .map(|index| Section {
                index,
                body: placeholder.to_string(),
                found: false,
            })
            .collect();
        Self { sections }
    }

    /// Stores a trimmed body for `index`. Out-of-range indices and bodies
    /// that are blank after trimming are ignored. Returns whether the body
    /// was stored.
    pub fn set(&mut self, index: usize, body: &str) -> bool {
        let body = body.trim();
        if body.is_empty() {
            return false;
        }

        match self.section_mut(index) {
            Some(section) => {
                section.body = body.to_string();
                section.found = true;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.section(index).map(|s| s.body.as_str())
    }

    pub fn is_found(&self, index: usize) -> bool {
        self.section(index).is_some_and(|s| s.found)
    }

    pub fn found_count(&self) -> usize {
        self.sections.iter().filter(|s| s.found).count()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    fn section(&self, index: usize) -> Option<&Section> {
        index.checked_sub(1).and_then(|i| self.sections.get(i))
    }

    fn section_mut(&mut self, index: usize) -> Option<&mut Section> {
        index.checked_sub(1).and_then(|i| self.sections.get_mut(i))
    }
}

impl Default for SectionSet {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_COUNT, DEFAULT_PLACEHOLDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_all_placeholders() {
        let set = SectionSet::default();
        assert_eq!(set.len(), 6);
        assert_eq!(set.found_count(), 0);
        assert!(set.iter().all(|s| s.body == DEFAULT_PLACEHOLDER));
        let indices: Vec<_> = set.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_set_trims_and_marks_found() {
        let mut set = SectionSet::default();
        assert!(set.set(2, "\n  World \n"));
        assert_eq!(set.get(2), Some("World"));
        assert!(set.is_found(2));
        assert!(!set.is_found(1));
    }

    #[test]
    fn test_set_ignores_out_of_range_and_blank() {
        let mut set = SectionSet::default();
        assert!(!set.set(0, "zero"));
        assert!(!set.set(7, "seven"));
        assert!(!set.set(3, "   "));
        assert_eq!(set.get(3), Some(DEFAULT_PLACEHOLDER));
        assert_eq!(set.get(7), None);
    }
}
