// file: src/models/table.rs
// description: extracted records keyed by trimmed header names
// reference: internal data structures

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the guide, field name to cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Inserts a field. A repeated name replaces the earlier value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from a header row and data rows.
    ///
    /// Header names are trimmed. A row shorter than the header is rejected;
    /// cells past the header width are dropped. `trim_cells` controls whether
    /// cell values are trimmed as well.
    pub fn from_grid<I>(source: &str, header: &[String], rows: I, trim_cells: bool) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let columns: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();
        let mut table = Table {
            columns: Vec::new(),
            records: Vec::new(),
        };
        table.add_columns(&columns);

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() < columns.len() {
                return Err(AnalysisError::format(format!(
                    "{}: row {} has {} cells but the header has {} columns",
                    source,
                    index + 2,
                    row.len(),
                    columns.len()
                )));
            }

            let record = columns
                .iter()
                .zip(row)
                .map(|(name, value)| {
                    let value = if trim_cells {
                        value.trim().to_string()
                    } else {
                        value
                    };
                    (name.clone(), value)
                })
                .collect();
            table.records.push(record);
        }

        Ok(table)
    }

    /// Appends another table, keeping row order and the union of columns.
    pub fn append(&mut self, other: Table) {
        self.add_columns(&other.columns);
        self.records.extend(other.records);
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn add_columns(&mut self, columns: &[String]) {
        for column in columns {
            if !self.has_column(column) {
                self.columns.push(column.clone());
            }
        }
    }
}
