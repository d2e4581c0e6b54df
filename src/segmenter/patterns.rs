// file: src/segmenter/patterns.rs
// description: compiled regex patterns for section markers
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Delimiter line emitted by the model, e.g. `===SECTION 3===`
    pub static ref SECTION_DELIMITER: Regex = Regex::new(
        r"(?m)^===SECTION (\d+)===\s*$"
    ).expect("SECTION_DELIMITER regex is valid");
}

/// Literal heading prefix used by the numeric-prefix strategy, e.g. `"3."`.
pub fn numeric_marker(index: usize) -> String {
    format!("{}.", index)
}

pub fn has_delimiter(text: &str) -> bool {
    SECTION_DELIMITER.is_match(text)
}
