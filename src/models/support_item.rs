// file: src/models/support_item.rs
// description: support item selected from the guide and fed into the prompt
// reference: internal data structures

use crate::config::FieldNames;
use crate::models::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportItem {
    pub reference_code: String,
    pub display_name: String,
    pub description: String,
    /// Remaining columns of the matched row, trimmed.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl SupportItem {
    /// Missing display name or description become empty strings.
    pub fn from_record(record: &Record, fields: &FieldNames) -> Self {
        let take = |name: &str| -> String {
            match record.get(name) {
                Some(value) => value.trim().to_string(),
                None => {
                    warn!("Matched row has no '{}' field, using empty text", name);
                    String::new()
                }
            }
        };

        let extra = record
            .iter()
            .filter(|(k, _)| {
                *k != fields.key && *k != fields.display_name && *k != fields.description
            })
            .map(|(k, v)| (k.to_string(), v.trim().to_string()))
            .collect();

        Self {
            reference_code: take(&fields.key),
            display_name: take(&fields.display_name),
            description: take(&fields.description),
            extra,
        }
    }
}
