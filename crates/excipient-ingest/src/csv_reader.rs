//! CSV input.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};
use crate::table::RawTable;

/// Read a CSV file into a raw table. The first non-blank row is the header.
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|error| csv_error(path, error))?;
    let mut table = RawTable::default();
    for record in reader.records() {
        let record = record.map_err(|error| csv_error(path, error))?;
        table.push_row(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}

/// I/O failures keep their `io::Error`; everything else is a parse error.
fn csv_error(path: &Path, error: csv::Error) -> IngestError {
    if !error.is_io_error() {
        return IngestError::CsvParse {
            path: path.to_path_buf(),
            message: error.to_string(),
        };
    }
    match error.into_kind() {
        csv::ErrorKind::Io(source) => IngestError::file_read(path, source),
        kind => IngestError::CsvParse {
            path: path.to_path_buf(),
            message: format!("{kind:?}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unopenable_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = read_csv_table(&dir.path().join("absent.csv")).expect_err("absent file");
        assert!(matches!(error, IngestError::FileRead { .. }));
    }

    #[test]
    fn directory_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = read_csv_table(dir.path()).expect_err("directory");
        assert!(matches!(error, IngestError::FileRead { .. }));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("latin1.csv");
        std::fs::write(&path, b"Name\ncaf\xe9\n").expect("write csv");
        let error = read_csv_table(&path).expect_err("invalid utf-8");
        assert!(matches!(error, IngestError::CsvParse { .. }));
    }
}
