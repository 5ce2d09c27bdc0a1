use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use excipient_ingest::{IngestError, load_records};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets><sheet name="Products" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/products.xml"/>
</Relationships>"#;

const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="5" uniqueCount="5">
  <si><t>English Product Name</t></si>
  <si><t>Drug Description</t></si>
  <si><t>Tylenol</t></si>
  <si><t xml:space="preserve">INACTIVE INGREDIENTS: lactose, starch &amp; talc.</t></si>
  <si><t>Advil</t></si>
</sst>"#;

const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
    <row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2" t="s"><v>3</v></c></row>
    <row r="3"><c r="A3" t="s"><v>4</v></c></row>
    <row r="4"><c r="A4"/><c r="B4"/></row>
  </sheetData>
</worksheet>"#;

fn write_workbook(path: &Path, parts: &[(&str, &str)]) {
    let file = File::create(path).expect("create workbook");
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, contents) in parts {
        writer.start_file(*name, options).expect("start part");
        writer.write_all(contents.as_bytes()).expect("write part");
    }
    writer.finish().expect("finish workbook");
}

fn temp_path(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
fn loads_first_sheet_of_workbook() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = temp_path(&dir, "products.xlsx");
    write_workbook(
        &path,
        &[
            ("[Content_Types].xml", CONTENT_TYPES),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/sharedStrings.xml", SHARED_STRINGS),
            ("xl/worksheets/products.xml", SHEET),
        ],
    );

    let records = load_records(&path).expect("load workbook");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("English Product Name"), "Tylenol");
    assert_eq!(
        records[0].get("Drug Description"),
        "INACTIVE INGREDIENTS: lactose, starch & talc."
    );
    assert_eq!(records[1].get("English Product Name"), "Advil");
    assert_eq!(records[1].get("Drug Description"), "");
}

#[test]
fn falls_back_to_sheet1_without_workbook_part() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = temp_path(&dir, "bare.xlsx");
    write_workbook(
        &path,
        &[
            ("xl/sharedStrings.xml", SHARED_STRINGS),
            ("xl/worksheets/sheet1.xml", SHEET),
        ],
    );

    let records = load_records(&path).expect("load workbook");
    assert_eq!(records.len(), 2);
}

#[test]
fn missing_worksheet_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = temp_path(&dir, "empty.xlsx");
    write_workbook(&path, &[("[Content_Types].xml", CONTENT_TYPES)]);

    let error = load_records(&path).expect_err("no worksheet");
    assert!(matches!(error, IngestError::MissingPart { .. }));
}

#[test]
fn non_zip_workbook_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = temp_path(&dir, "fake.xlsx");
    fs::write(&path, "not a zip archive").expect("write file");

    let error = load_records(&path).expect_err("invalid archive");
    assert!(matches!(error, IngestError::Archive { .. }));
}

#[test]
fn loads_csv_with_ragged_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = temp_path(&dir, "products.csv");
    fs::write(
        &path,
        "English Product Name,,Excipients\nTylenol\nAdvil,x,\"starch, talc\",extra\n",
    )
    .expect("write csv");

    let records = load_records(&path).expect("load csv");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("col1"), "");
    assert_eq!(records[0].get("Excipients"), "");
    assert_eq!(records[1].get("col1"), "x");
    assert_eq!(records[1].get("Excipients"), "starch, talc");
    assert_eq!(records[1].len(), 3);
}

#[test]
fn missing_file_is_an_error() {
    let error = load_records(Path::new("/definitely/not/here.xlsx")).expect_err("missing");
    assert!(matches!(error, IngestError::FileNotFound { .. }));
}

#[test]
fn unknown_extension_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = temp_path(&dir, "products.ods");
    fs::write(&path, "").expect("write file");

    let error = load_records(&path).expect_err("unsupported");
    assert!(matches!(error, IngestError::UnsupportedFormat { .. }));
}
