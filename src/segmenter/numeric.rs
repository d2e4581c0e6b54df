// file: src/segmenter/numeric.rs
// description: legacy section splitting on `N.` heading prefixes
// reference: internal heuristics

use crate::models::SectionSet;
use crate::segmenter::patterns::numeric_marker;

/// Fills `sections` using the first occurrence of `"N."` for each index.
///
/// A body runs from just after its marker to the smallest position among
/// markers with a larger number, or to the end of the text. When that
/// position lies before the body start the body is empty and the section
/// keeps the placeholder. Any `N.` in the text counts, so decimals and list
/// numbering produce false matches.
pub fn split_on_numeric_prefixes(text: &str, sections: &mut SectionSet) -> usize {
    let count = sections.len();
    let markers: Vec<Option<(usize, usize)>> = (1..=count)
        .map(|index| {
            let marker = numeric_marker(index);
            text.find(&marker).map(|pos| (pos, pos + marker.len()))
        })
        .collect();

    let mut stored = 0;

    for (offset, marker) in markers.iter().enumerate() {
        let Some((_, body_start)) = marker else {
            continue;
        };

        let body_end = markers[offset + 1..]
            .iter()
            .flatten()
            .map(|(start, _)| *start)
            .min()
            .unwrap_or(text.len());

        let body = text.get(*body_start..body_end).unwrap_or("");
        if sections.set(offset + 1, body) {
            stored += 1;
        }
    }

    stored
}
