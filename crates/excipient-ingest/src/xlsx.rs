//! Office Open XML workbook input.
//!
//! A workbook is a zip archive of XML parts. Only the parts needed to read
//! cell text are touched:
//!
//! - `xl/workbook.xml` and `xl/_rels/workbook.xml.rels` to find the first
//!   worksheet (falls back to `xl/worksheets/sheet1.xml`)
//! - `xl/sharedStrings.xml` for the shared string table (optional)
//! - the worksheet part itself

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::mem;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{IngestError, Result};
use crate::table::RawTable;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const DEFAULT_SHEET_PART: &str = "xl/worksheets/sheet1.xml";
/// Column count of a worksheet; `XFD` is the last valid column.
const MAX_COLUMNS: usize = 16_384;

/// Read the first worksheet of a workbook into a raw table.
pub fn read_xlsx_table(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|source| IngestError::file_read(path, source))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|source| IngestError::Archive {
            path: path.to_path_buf(),
            source,
        })?;

    let shared_strings = match read_part(&mut archive, path, SHARED_STRINGS_PART)? {
        Some(xml) => parse_shared_strings(&xml, path)?,
        None => Vec::new(),
    };
    let sheet_part = first_sheet_part(&mut archive, path)?;
    debug!(
        path = %path.display(),
        sheet_part = %sheet_part,
        shared_strings = shared_strings.len(),
        "reading worksheet"
    );
    let sheet_xml =
        read_part(&mut archive, path, &sheet_part)?.ok_or_else(|| IngestError::MissingPart {
            path: path.to_path_buf(),
            part: sheet_part.clone(),
        })?;
    parse_sheet(&sheet_xml, &shared_strings, path, &sheet_part)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &Path,
    part: &str,
) -> Result<Option<String>> {
    match archive.by_name(part) {
        Ok(mut entry) => {
            let mut xml = String::new();
            entry
                .read_to_string(&mut xml)
                .map_err(|source| IngestError::file_read(path, source))?;
            Ok(Some(xml))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(source) => Err(IngestError::Archive {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn xml_error(path: &Path, part: &str, error: impl std::fmt::Display) -> IngestError {
    IngestError::Xml {
        path: path.to_path_buf(),
        part: part.to_string(),
        message: error.to_string(),
    }
}

fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .with_checks(false)
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Attribute lookup by local name, ignoring any namespace prefix (`r:id`).
fn attribute_local(element: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    element
        .attributes()
        .with_checks(false)
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Resolve a general entity reference body (`amp`, `#38`, `#x26`).
fn resolve_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

fn first_sheet_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &Path) -> Result<String> {
    let Some(workbook) = read_part(archive, path, WORKBOOK_PART)? else {
        return Ok(DEFAULT_SHEET_PART.to_string());
    };
    let Some(rel_id) = first_sheet_rel_id(&workbook, path)? else {
        return Ok(DEFAULT_SHEET_PART.to_string());
    };
    let Some(rels) = read_part(archive, path, WORKBOOK_RELS_PART)? else {
        return Ok(DEFAULT_SHEET_PART.to_string());
    };
    Ok(relationship_target(&rels, &rel_id, path)?
        .map(|target| resolve_target(&target))
        .unwrap_or_else(|| DEFAULT_SHEET_PART.to_string()))
}

fn first_sheet_rel_id(xml: &str, path: &Path) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader
            .read_event()
            .map_err(|error| xml_error(path, WORKBOOK_PART, error))?
        {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                return Ok(attribute_local(&e, b"id"));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn relationship_target(xml: &str, rel_id: &str, path: &Path) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader
            .read_event()
            .map_err(|error| xml_error(path, WORKBOOK_RELS_PART, error))?
        {
            Event::Start(e) | Event::Empty(e)
                if e.local_name().as_ref() == b"Relationship"
                    && attribute(&e, b"Id").as_deref() == Some(rel_id) =>
            {
                return Ok(attribute(&e, b"Target"));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Relationship targets are relative to `xl/` unless absolute.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

fn parse_shared_strings(xml: &str, path: &Path) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;
    let mut in_phonetic = false;
    loop {
        let event = reader
            .read_event()
            .map_err(|error| xml_error(path, SHARED_STRINGS_PART, error))?;
        let capture = in_item && in_text && !in_phonetic;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(mem::take(&mut current));
                    in_item = false;
                }
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Event::Text(text) if capture => current.push_str(&String::from_utf8_lossy(&text)),
            Event::CData(text) if capture => current.push_str(&String::from_utf8_lossy(&text)),
            Event::GeneralRef(entity) if capture => {
                if let Some(ch) = resolve_entity(&String::from_utf8_lossy(&entity)) {
                    current.push(ch);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(strings)
}

/// Zero-based column index from a cell reference such as `AB12`.
fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<char> = reference
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for letter in letters {
        let digit = (letter.to_ascii_uppercase() as usize) - ('A' as usize) + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

#[derive(Debug, Default)]
struct CellState {
    column: usize,
    kind: Option<String>,
    text: String,
    in_value: bool,
    in_inline: bool,
    in_text: bool,
    in_phonetic: bool,
}

impl CellState {
    fn capturing(&self) -> bool {
        self.in_value || (self.in_inline && self.in_text && !self.in_phonetic)
    }
}

fn parse_sheet(xml: &str, shared: &[String], path: &Path, part: &str) -> Result<RawTable> {
    let mut reader = Reader::from_str(xml);
    let mut table = RawTable::default();
    let mut row: Vec<String> = Vec::new();
    let mut cell: Option<CellState> = None;
    let mut next_column = 0usize;
    loop {
        let event = reader
            .read_event()
            .map_err(|error| xml_error(path, part, error))?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    row.clear();
                    next_column = 0;
                }
                b"c" => cell = Some(start_cell(&e, next_column, path)?),
                b"v" => set_flag(&mut cell, |state| state.in_value = true),
                b"is" => set_flag(&mut cell, |state| state.in_inline = true),
                b"t" => set_flag(&mut cell, |state| state.in_text = true),
                b"rPh" => set_flag(&mut cell, |state| state.in_phonetic = true),
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                let state = start_cell(&e, next_column, path)?;
                next_column = state.column + 1;
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"row" => table.push_row(mem::take(&mut row)),
                b"c" => {
                    if let Some(state) = cell.take() {
                        next_column = state.column + 1;
                        let value = cell_value(&state, shared, path)?;
                        place(&mut row, state.column, value);
                    }
                }
                b"v" => set_flag(&mut cell, |state| state.in_value = false),
                b"is" => set_flag(&mut cell, |state| state.in_inline = false),
                b"t" => set_flag(&mut cell, |state| state.in_text = false),
                b"rPh" => set_flag(&mut cell, |state| state.in_phonetic = false),
                _ => {}
            },
            Event::Text(text) => capture(&mut cell, &String::from_utf8_lossy(&text)),
            Event::CData(text) => capture(&mut cell, &String::from_utf8_lossy(&text)),
            Event::GeneralRef(entity) => {
                if let Some(ch) = resolve_entity(&String::from_utf8_lossy(&entity)) {
                    capture(&mut cell, ch.encode_utf8(&mut [0u8; 4]));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(table)
}

fn start_cell(element: &BytesStart<'_>, next_column: usize, path: &Path) -> Result<CellState> {
    let column = match attribute(element, b"r") {
        Some(reference) => column_index(&reference)
            .filter(|column| *column < MAX_COLUMNS)
            .ok_or_else(|| {
                IngestError::format(path, format!("invalid cell reference '{reference}'"))
            })?,
        None if next_column < MAX_COLUMNS => next_column,
        None => {
            return Err(IngestError::format(
                path,
                format!("row has more than {MAX_COLUMNS} cells"),
            ));
        }
    };
    Ok(CellState {
        column,
        kind: attribute(element, b"t"),
        ..CellState::default()
    })
}

fn set_flag(cell: &mut Option<CellState>, apply: impl FnOnce(&mut CellState)) {
    if let Some(state) = cell.as_mut() {
        apply(state);
    }
}

fn capture(cell: &mut Option<CellState>, text: &str) {
    if let Some(state) = cell.as_mut()
        && state.capturing()
    {
        state.text.push_str(text);
    }
}

fn cell_value(state: &CellState, shared: &[String], path: &Path) -> Result<String> {
    match state.kind.as_deref() {
        Some("s") => {
            let raw = state.text.trim();
            let index: usize = raw.parse().map_err(|_| {
                IngestError::format(path, format!("invalid shared string index '{raw}'"))
            })?;
            shared.get(index).cloned().ok_or_else(|| {
                IngestError::format(path, format!("shared string index {index} out of range"))
            })
        }
        Some("b") => Ok(if state.text.trim() == "1" {
            "TRUE".to_string()
        } else {
            "FALSE".to_string()
        }),
        _ => Ok(state.text.clone()),
    }
}

fn place(row: &mut Vec<String>, column: usize, value: String) {
    if row.len() <= column {
        row.resize(column + 1, String::new());
    }
    row[column] = value;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_index_handles_multi_letter_references() {
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("Z9"), Some(25));
        assert_eq!(column_index("AA10"), Some(26));
        assert_eq!(column_index("ab3"), Some(27));
        assert_eq!(column_index("12"), None);
    }

    #[test]
    fn resolves_entities() {
        assert_eq!(resolve_entity("amp"), Some('&'));
        assert_eq!(resolve_entity("#38"), Some('&'));
        assert_eq!(resolve_entity("#x26"), Some('&'));
        assert_eq!(resolve_entity("nbsp"), None);
    }

    #[test]
    fn relationship_targets_are_rooted_under_xl() {
        assert_eq!(resolve_target("worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
        assert_eq!(resolve_target("/xl/worksheets/a.xml"), "xl/worksheets/a.xml");
    }

    #[test]
    fn shared_strings_join_rich_text_runs_and_skip_phonetics() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <si><t>Plain</t></si>
  <si><r><t>Rich </t></r><r><t>text</t></r><rPh><t>ignored</t></rPh></si>
  <si/>
  <si><t>FD&amp;C Red</t></si>
</sst>"#;
        let strings = parse_shared_strings(xml, Path::new("book.xlsx")).expect("parse");
        assert_eq!(strings, vec!["Plain", "Rich text", "", "FD&C Red"]);
    }

    #[test]
    fn sheet_places_cells_by_reference() {
        let shared = vec!["Name".to_string(), "Excipients".to_string(), "Tylenol".to_string()];
        let xml = r#"<worksheet><sheetData>
  <row r="1"><c r="A1" t="s"><v>0</v></c><c r="C1" t="s"><v>1</v></c></row>
  <row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>500</v></c><c r="C2" t="inlineStr"><is><t>lactose</t></is></c></row>
  <row r="3"><c r="A3" t="b"><v>1</v></c></row>
</sheetData></worksheet>"#;
        let table = parse_sheet(xml, &shared, Path::new("book.xlsx"), DEFAULT_SHEET_PART)
            .expect("parse sheet");
        assert_eq!(table.rows[0], vec!["Name", "", "Excipients"]);
        assert_eq!(table.rows[1], vec!["Tylenol", "500", "lactose"]);
        assert_eq!(table.rows[2], vec!["TRUE"]);
    }

    #[test]
    fn bad_shared_string_index_is_an_error() {
        let xml = r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>7</v></c></row></sheetData></worksheet>"#;
        let error = parse_sheet(xml, &[], Path::new("book.xlsx"), DEFAULT_SHEET_PART)
            .expect_err("index out of range");
        assert!(matches!(error, IngestError::FileFormat { .. }));
    }

    #[test]
    fn out_of_range_cell_reference_is_an_error() {
        let xml = r#"<worksheet><sheetData><row r="1"><c r="ZZZZZZZZ1" t="inlineStr"><is><t>x</t></is></c></row></sheetData></worksheet>"#;
        let error = parse_sheet(xml, &[], Path::new("book.xlsx"), DEFAULT_SHEET_PART)
            .expect_err("column beyond XFD");
        assert!(matches!(error, IngestError::FileFormat { .. }));
        assert!(error.to_string().contains("ZZZZZZZZ1"));
    }

    #[test]
    fn last_worksheet_column_is_accepted() {
        let xml = r#"<worksheet><sheetData><row r="1"><c r="XFD1" t="inlineStr"><is><t>x</t></is></c></row></sheetData></worksheet>"#;
        let table = parse_sheet(xml, &[], Path::new("book.xlsx"), DEFAULT_SHEET_PART)
            .expect("parse sheet");
        assert_eq!(table.rows[0].len(), MAX_COLUMNS);
        assert_eq!(table.rows[0][MAX_COLUMNS - 1], "x");
        let error = parse_sheet(
            &xml.replace("XFD1", "XFE1"),
            &[],
            Path::new("book.xlsx"),
            DEFAULT_SHEET_PART,
        )
        .expect_err("column beyond XFD");
        assert!(matches!(error, IngestError::FileFormat { .. }));
    }

    #[test]
    fn finds_first_sheet_relationship() {
        let workbook = r#"<workbook xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="Data" sheetId="1" r:id="rId3"/><sheet name="Other" sheetId="2" r:id="rId1"/></sheets>
</workbook>"#;
        let rels = r#"<Relationships>
  <Relationship Id="rId1" Target="worksheets/sheet2.xml"/>
  <Relationship Id="rId3" Target="worksheets/sheet1.xml"/>
</Relationships>"#;
        let path = Path::new("book.xlsx");
        let rel_id = first_sheet_rel_id(workbook, path).expect("parse").expect("rel id");
        assert_eq!(rel_id, "rId3");
        let target = relationship_target(rels, &rel_id, path).expect("parse");
        assert_eq!(target.as_deref(), Some("worksheets/sheet1.xml"));
    }
}
