// file: src/lookup.rs
// description: reference code lookup over an extracted table
// reference: internal module structure

use crate::error::{AnalysisError, Result};
use crate::models::{Record, Table};
use tracing::{debug, warn};

/// Returns the first record whose `key_field` equals `ref_code`.
///
/// Both sides are trimmed and compared case-sensitively. Duplicate codes are
/// tolerated; the earliest row in table order wins.
pub fn lookup<'a>(table: &'a Table, key_field: &str, ref_code: &str) -> Result<&'a Record> {
    let wanted = ref_code.trim();

    if !table.is_empty() && !table.has_column(key_field) {
        return Err(AnalysisError::format(format!(
            "the document has no '{}' column",
            key_field
        )));
    }

    let mut matches = table
        .records
        .iter()
        .filter(|record| record.get(key_field).is_some_and(|v| v.trim() == wanted));

    let first = matches
        .next()
        .ok_or_else(|| AnalysisError::NotFound(wanted.to_string()))?;

    let duplicates = matches.count();
    if duplicates > 0 {
        warn!(
            "Ref No. '{}' matches {} rows, using the first",
            wanted,
            duplicates + 1
        );
    } else {
        debug!("Ref No. '{}' matched a single row", wanted);
    }

    Ok(first)
}
