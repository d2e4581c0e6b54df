// file: src/parser/spreadsheet.rs
// description: first-worksheet extraction from workbook formats
// reference: https://docs.rs/calamine

use crate::error::{AnalysisError, Result};
use crate::models::Table;
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

pub struct SpreadsheetParser;

impl SpreadsheetParser {
    pub fn new() -> Self {
        Self
    }

    /// Reads the first worksheet; its first row holds the field names.
    pub fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| AnalysisError::format(format!("cannot open workbook: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .unwrap_or_else(|| "sheet 1".to_string());

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AnalysisError::format("workbook has no worksheets"))?
            .map_err(|e| AnalysisError::format(format!("cannot read {}: {}", sheet_name, e)))?;

        debug!(
            "Worksheet '{}' spans {} rows x {} columns",
            sheet_name,
            range.height(),
            range.width()
        );

        Self::range_to_table(&sheet_name, &range)
    }

    /// Fully blank rows are skipped.
    pub fn range_to_table(source: &str, range: &Range<Data>) -> Result<Table> {
        let mut rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<String>>())
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()));

        let header = rows
            .next()
            .ok_or_else(|| AnalysisError::format(format!("{} is empty", source)))?;

        Table::from_grid(source, &header, rows, false)
    }
}

impl Default for SpreadsheetParser {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
