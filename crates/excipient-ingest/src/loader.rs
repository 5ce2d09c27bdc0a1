//! Format dispatch for spreadsheet inputs.

use std::path::Path;

use excipient_model::Record;
use tracing::info;

use crate::csv_reader::read_csv_table;
use crate::error::{IngestError, Result};
use crate::xlsx::read_xlsx_table;

/// Supported spreadsheet encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" | "xlsm" => Some(Self::Workbook),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Load every data row of a spreadsheet as a [`Record`], in source order.
///
/// # Errors
///
/// Returns an [`IngestError`] when the file is missing, unreadable, or not
/// parseable as a table in its detected format.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let format = SourceFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let table = match format {
        SourceFormat::Workbook => read_xlsx_table(path)?,
        SourceFormat::Csv => read_csv_table(path)?,
    };
    let headers = table.headers();
    let records = table.into_records();
    info!(
        path = %path.display(),
        format = ?format,
        column_count = headers.len(),
        record_count = records.len(),
        "loaded records"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("test 2.XLSX")),
            Some(SourceFormat::Workbook)
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("rows.csv")),
            Some(SourceFormat::Csv)
        );
        assert_eq!(SourceFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(SourceFormat::from_path(Path::new("noext")), None);
    }
}
