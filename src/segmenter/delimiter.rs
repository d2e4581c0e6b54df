// file: src/segmenter/delimiter.rs
// description: section splitting on explicit `===SECTION N===` marker lines
// reference: https://docs.rs/regex

use crate::models::SectionSet;
use crate::segmenter::patterns::SECTION_DELIMITER;
use tracing::debug;

/// Fills `sections` from the text between consecutive marker lines.
///
/// Every marker line ends the previous body, including markers whose number
/// is outside the set or written with leading zeros. When a number repeats, the last non-empty body wins.
/// Returns the number of bodies stored.
pub fn split_on_delimiters(text: &str, sections: &mut SectionSet) -> usize {
    let markers: Vec<(Option<usize>, usize, usize)> = SECTION_DELIMITER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let index = caps.get(1).and_then(|m| canonical_index(m.as_str()));
            Some((index, whole.start(), whole.end()))
        })
        .collect();

    let mut stored = 0;

    for (position, (index, _, body_start)) in markers.iter().enumerate() {
        let body_end = markers
            .get(position + 1)
            .map(|(_, start, _)| *start)
            .unwrap_or(text.len());

        let Some(index) = index else {
            continue;
        };

        if sections.set(*index, &text[*body_start..body_end]) {
            stored += 1;
        } else {
            debug!("Ignoring section marker {} (out of range or empty)", index);
        }
    }

    stored
}

/// Section number as written in canonical decimal; `01` names no section.
fn canonical_index(digits: &str) -> Option<usize> {
    digits
        .parse::<usize>()
        .ok()
        .filter(|index| index.to_string() == digits)
}
