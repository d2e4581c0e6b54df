// file: src/parser/word.rs
// description: table extraction from word processing (.docx) documents
// reference: https://docs.rs/quick-xml, https://docs.rs/zip

use crate::error::{AnalysisError, Result};
use crate::models::Table;
use quick_xml::Reader as XmlReader;
use quick_xml::events::{BytesStart, Event};
use std::io::{Cursor, Read as IoRead};
use std::iter;
use tracing::{debug, info};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Raw cell text of one body table, row by row.
pub type RawTable = Vec<Vec<String>>;

/// Collects the rows of every table whose header carries the required
/// field names and concatenates them in document order.
pub struct WordTableParser {
    required_headers: Vec<String>,
}

impl WordTableParser {
    pub fn new(required_headers: Vec<String>) -> Self {
        Self {
            required_headers: required_headers
                .into_iter()
                .map(|h| h.trim().to_string())
                .collect(),
        }
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let xml = read_document_part(bytes)?;
        let raw_tables = read_tables(&xml)?;
        debug!("Document contains {} top-level tables", raw_tables.len());

        let mut table = Table::new();
        let mut accepted = 0;

        for (index, raw) in raw_tables.into_iter().enumerate() {
            let mut rows = raw.into_iter();
            let Some(header) = rows.next() else {
                continue;
            };
            let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

            if !self.accepts(&header) {
                debug!("Skipping table {}: header {:?}", index + 1, header);
                continue;
            }

            let source = format!("table {}", index + 1);
            table.append(Table::from_grid(&source, &header, rows, true)?);
            accepted += 1;
        }

        if accepted == 0 {
            return Err(AnalysisError::format(format!(
                "no table has the headers {:?}",
                self.required_headers
            )));
        }

        info!(
            "Read {} records from {} matching tables",
            table.len(),
            accepted
        );
        Ok(table)
    }

    fn accepts(&self, header: &[String]) -> bool {
        self.required_headers
            .iter()
            .all(|required| header.iter().any(|h| h == required))
    }
}

fn read_document_part(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AnalysisError::format(format!("not a docx container: {}", e)))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| AnalysisError::format(format!("missing {}: {}", DOCUMENT_PART, e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| AnalysisError::format(format!("cannot read {}: {}", DOCUMENT_PART, e)))?;
    Ok(xml)
}

/// Returns the cell text of every top-level table in `w:document` order.
///
/// Nested tables and tables inside text boxes are skipped along with their
/// text. Horizontally merged
/// cells repeat across their grid span and vertically merged continuation
/// cells repeat the text above.
pub fn read_tables(xml: &str) -> Result<Vec<RawTable>> {
    let mut reader = XmlReader::from_str(xml);
    let mut buf = Vec::new();
    let mut walker = TableWalker::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => walker.open(&e),
            Ok(Event::Empty(e)) => {
                walker.open(&e);
                walker.close(e.local_name().as_ref());
            }
            Ok(Event::Text(e)) => {
                if walker.in_text {
                    let text = e.unescape().map_err(|err| {
                        AnalysisError::format(format!("bad text in {}: {}", DOCUMENT_PART, err))
                    })?;
                    walker.push_text(&text);
                }
            }
            Ok(Event::End(e)) => walker.close(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AnalysisError::format(format!(
                    "malformed {} at byte {}: {}",
                    DOCUMENT_PART,
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(walker.tables)
}

struct CellState {
    paragraphs: Vec<String>,
    span: usize,
    continues_merge: bool,
}

/// Drawing content that is not part of the body flow. Word writes each text
/// box twice, once per `mc:Choice` and once per `mc:Fallback`.
fn is_detached(name: &[u8]) -> bool {
    matches!(name, b"txbxContent" | b"Fallback")
}

#[derive(Default)]
struct TableWalker {
    detached: usize,
    depth: usize,
    tables: Vec<RawTable>,
    rows: RawTable,
    row: Option<Vec<(String, bool)>>,
    cell: Option<CellState>,
    in_run: bool,
    in_text: bool,
}

impl TableWalker {
    fn open(&mut self, e: &BytesStart<'_>) {
        let name = e.local_name();
        let name = name.as_ref();

        if is_detached(name) {
            self.detached += 1;
            return;
        }
        if self.detached > 0 {
            return;
        }

        if name == b"tbl" {
            self.depth += 1;
            if self.depth == 1 {
                self.rows.clear();
            }
            return;
        }
        if self.depth != 1 {
            return;
        }

        match name {
            b"tr" => self.row = Some(Vec::new()),
            b"tc" => {
                self.cell = Some(CellState {
                    paragraphs: Vec::new(),
                    span: 1,
                    continues_merge: false,
                })
            }
            b"p" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.paragraphs.push(String::new());
                }
            }
            b"r" => self.in_run = true,
            b"t" => self.in_text = self.cell.is_some(),
            b"tab" if self.in_run => self.push_text("\t"),
            b"br" | b"cr" if self.in_run => self.push_text("\n"),
            b"gridSpan" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.span = attribute(e, b"val")
                        .and_then(|v| v.parse::<usize>().ok())
                        .unwrap_or(1)
                        .max(1);
                }
            }
            b"vMerge" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.continues_merge = attribute(e, b"val").as_deref() != Some("restart");
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        if is_detached(name) {
            self.detached = self.detached.saturating_sub(1);
            return;
        }
        if self.detached > 0 {
            return;
        }

        if name == b"tbl" {
            if self.depth == 1 {
                self.tables.push(std::mem::take(&mut self.rows));
            }
            self.depth = self.depth.saturating_sub(1);
            return;
        }
        if self.depth != 1 {
            return;
        }

        match name {
            b"t" => self.in_text = false,
            b"r" => self.in_run = false,
            b"tc" => {
                if let (Some(cell), Some(row)) = (self.cell.take(), self.row.as_mut()) {
                    let text = cell.paragraphs.join("\n");
                    row.extend(iter::repeat_n((text, cell.continues_merge), cell.span));
                }
            }
            b"tr" => {
                if let Some(row) = self.row.take() {
                    let above = self.rows.last();
                    let resolved = row
                        .into_iter()
                        .enumerate()
                        .map(|(col, (text, continues))| match above {
                            Some(prev) if continues => prev.get(col).cloned().unwrap_or(text),
                            _ => text,
                        })
                        .collect();
                    self.rows.push(resolved);
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(cell) = self.cell.as_mut() {
            if cell.paragraphs.is_empty() {
                cell.paragraphs.push(String::new());
            }
            if let Some(paragraph) = cell.paragraphs.last_mut() {
                paragraph.push_str(text);
            }
        }
    }
}

fn attribute(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &[&str] = &["Reference Code", "Display Name", "Description"];

    fn parser() -> WordTableParser {
        WordTableParser::new(HEADER.iter().map(|h| h.to_string()).collect())
    }

    #[test]
    fn test_single_table_scenario() {
        let bytes = docx(&table(&[HEADER, &["ABC123", "Widget", "A test widget"]]));

        let table = parser().parse(&bytes).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].get("Reference Code"), Some("ABC123"));
        assert_eq!(table.records[0].get("Display Name"), Some("Widget"));
        assert_eq!(table.records[0].get("Description"), Some("A test widget"));
    }

    #[test]
    fn test_concatenates_matching_tables_in_order() {
        let body = format!(
            "<w:p><w:r><w:t>Intro</w:t></w:r></w:p>{}{}{}",
            table(&[HEADER, &["A1", "one", "d1"], &["A2", "two", "d2"]]),
            table(&[&["Unrelated", "Columns"], &["x", "y"]]),
            table(&[
                &["Reference Code", "Display Name", "Description", "Unit"],
                &["B1", "three", "d3", "Each"],
            ]),
        );

        let table = parser().parse(&docx(&body)).unwrap();

        let codes: Vec<_> = table
            .records
            .iter()
            .filter_map(|r| r.get("Reference Code"))
            .collect();
        assert_eq!(codes, vec!["A1", "A2", "B1"]);
        assert_eq!(table.records[2].get("Unit"), Some("Each"));
        assert!(table.has_column("Unit"));
    }

    #[test]
    fn test_header_and_cells_trimmed() {
        let bytes = docx(&table(&[
            &[" Reference Code ", "Display Name  ", "Description"],
            &["  A1 ", " Walker ", " Frame "],
        ]));

        let table = parser().parse(&bytes).unwrap();
        assert_eq!(table.records[0].get("Reference Code"), Some("A1"));
        assert_eq!(table.records[0].get("Display Name"), Some("Walker"));
    }

    #[test]
    fn test_no_matching_table_fails() {
        let bytes = docx(&table(&[&["Code", "Name"], &["A1", "one"]]));
        let err = parser().parse(&bytes).unwrap_err();
        assert!(matches!(err, AnalysisError::UnrecognizedFormat(_)));
    }

    #[test]
    fn test_document_without_tables_fails() {
        let bytes = docx("<w:p><w:r><w:t>Just prose</w:t></w:r></w:p>");
        assert!(parser().parse(&bytes).is_err());
    }

    #[test]
    fn test_short_row_fails() {
        let body = format!(
            "<w:tbl><w:tr>{}{}{}</w:tr><w:tr>{}{}</w:tr></w:tbl>",
            cell("Reference Code"),
            cell("Display Name"),
            cell("Description"),
            cell("A1"),
            cell("one"),
        );
        let err = parser().parse(&docx(&body)).unwrap_err();
        assert!(err.to_string().contains("table 1"));
    }

    #[test]
    fn test_not_a_zip() {
        let err = parser().parse(b"plain text").unwrap_err();
        assert!(matches!(err, AnalysisError::UnrecognizedFormat(_)));
    }

    #[test]
    fn test_cell_text_runs_paragraphs_and_tabs() {
        let xml = document_xml(
            "<w:tbl><w:tr><w:tc>\
             <w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr>\
             <w:r><w:t>Hello</w:t></w:r><w:r><w:tab/><w:t xml:space=\"preserve\"> world &amp; co</w:t></w:r></w:p>\
             <w:p><w:r><w:t>second</w:t><w:br/><w:t>line</w:t></w:r></w:p>\
             </w:tc></w:tr></w:tbl>",
        );

        let tables = read_tables(&xml).unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0][0][0], "Hello\t world & co\nsecond\nline");
    }

    #[test]
    fn test_nested_table_is_ignored() {
        let inner = table(&[&["inner"]]);
        let xml = document_xml(&format!(
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>outer</w:t></w:r></w:p>{}</w:tc>{}</w:tr></w:tbl>",
            inner,
            cell("second")
        ));

        let tables = read_tables(&xml).unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0], vec![vec!["outer".to_string(), "second".to_string()]]);
    }

    #[test]
    fn test_grid_span_and_vertical_merge() {
        let xml = document_xml(
            "<w:tbl>\
             <w:tr>\
               <w:tc><w:tcPr><w:gridSpan w:val=\"2\"/></w:tcPr><w:p><w:r><w:t>wide</w:t></w:r></w:p></w:tc>\
               <w:tc><w:tcPr><w:vMerge w:val=\"restart\"/></w:tcPr><w:p><w:r><w:t>tall</w:t></w:r></w:p></w:tc>\
             </w:tr>\
             <w:tr>\
               <w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc>\
               <w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc>\
               <w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc>\
             </w:tr>\
             </w:tbl>",
        );

        let tables = read_tables(&xml).unwrap();

        assert_eq!(tables[0][0], vec!["wide", "wide", "tall"]);
        assert_eq!(tables[0][1], vec!["a", "b", "tall"]);
    }

    #[test]
    fn test_text_box_tables_are_ignored() {
        let boxed = table(&[HEADER, &["BOX1", "Boxed", "inside a text box"]]);
        let xml = document_xml(&format!(
            "<w:p><w:r><mc:AlternateContent>\
             <mc:Choice Requires=\"wps\"><w:drawing><wps:txbx><w:txbxContent>{boxed}</w:txbxContent></wps:txbx></w:drawing></mc:Choice>\
             <mc:Fallback><w:pict><v:textbox><w:txbxContent>{boxed}</w:txbxContent></v:textbox></w:pict></mc:Fallback>\
             </mc:AlternateContent></w:r></w:p>{body}",
            boxed = boxed,
            body = table(&[HEADER, &["ABC123", "Widget", "A test widget"]]),
        ));

        let tables = read_tables(&xml).unwrap();

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0][1][0], "ABC123");
    }
}
