// file: src/parser/delimited.rs
// description: comma separated text with a header line
// reference: https://docs.rs/csv

use crate::error::{AnalysisError, Result};
use crate::models::Table;

pub struct DelimitedParser;

impl DelimitedParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                AnalysisError::format(format!("csv line {}: {}", index + 1, e))
            })?;
            // Rows with only blank cells, e.g. a lone `,`, carry no record.
            if record.iter().any(|cell| !cell.trim().is_empty()) {
                rows.push(record.iter().map(str::to_string).collect::<Vec<String>>());
            }
        }

        let mut rows = rows.into_iter();
        let mut header = rows
            .next()
            .ok_or_else(|| AnalysisError::format("csv document is empty"))?;
        if let Some(first) = header.first_mut() {
            *first = first.trim_start_matches('\u{feff}').to_string();
        }

        Table::from_grid("csv", &header, rows, false)
    }
}

impl Default for DelimitedParser {
    fn default() -> Self {
        Self::new()
    }
}
