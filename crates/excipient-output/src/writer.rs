use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use excipient_model::ResultRow;
use tracing::info;

use crate::error::{OutputError, Result};

pub const CATALOG_HEADER: &str = "excipient";

/// Columns of the result table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputLayout {
    /// `product,excipients,notes`
    #[default]
    WithNotes,
    /// `product,excipients`
    ExcipientsOnly,
}

impl OutputLayout {
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Self::WithNotes => &["product", "excipients", "notes"],
            Self::ExcipientsOnly => &["product", "excipients"],
        }
    }
}

impl fmt::Display for OutputLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithNotes => f.write_str("with-notes"),
            Self::ExcipientsOnly => f.write_str("excipients-only"),
        }
    }
}

/// Write one CSV row per result, lists joined with `"; "`.
///
/// Parent directories of `path` are created as needed; an existing file is
/// replaced.
pub fn write_results(path: &Path, rows: &[ResultRow], layout: OutputLayout) -> Result<()> {
    let mut writer = open_writer(path)?;
    write_result_rows(&mut writer, rows, layout).map_err(|source| OutputError::CsvWrite {
        path: path.to_path_buf(),
        source,
    })?;
    finish(writer, path)?;
    info!(
        path = %path.display(),
        layout = %layout,
        row_count = rows.len(),
        "wrote results"
    );
    Ok(())
}

/// Write a single-column CSV of excipient names.
pub fn write_catalog(path: &Path, excipients: &[String]) -> Result<()> {
    let mut writer = open_writer(path)?;
    write_catalog_rows(&mut writer, excipients).map_err(|source| OutputError::CsvWrite {
        path: path.to_path_buf(),
        source,
    })?;
    finish(writer, path)?;
    info!(
        path = %path.display(),
        excipient_count = excipients.len(),
        "wrote excipient catalog"
    );
    Ok(())
}

fn open_writer(path: &Path) -> Result<Writer<fs::File>> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    WriterBuilder::new()
        .from_path(path)
        .map_err(|source| OutputError::CsvWrite {
            path: path.to_path_buf(),
            source,
        })
}

fn finish(mut writer: Writer<fs::File>, path: &Path) -> Result<()> {
    writer.flush().map_err(|source| OutputError::Flush {
        path: path.to_path_buf(),
        source,
    })
}

fn write_result_rows<W: Write>(
    writer: &mut Writer<W>,
    rows: &[ResultRow],
    layout: OutputLayout,
) -> csv::Result<()> {
    writer.write_record(layout.headers())?;
    for row in rows {
        let excipients = row.excipients_joined();
        match layout {
            OutputLayout::WithNotes => {
                let notes = row.notes_joined();
                writer.write_record([
                    row.product.as_str(),
                    excipients.as_str(),
                    notes.as_str(),
                ])?;
            }
            OutputLayout::ExcipientsOnly => {
                writer.write_record([row.product.as_str(), excipients.as_str()])?;
            }
        }
    }
    Ok(())
}

fn write_catalog_rows<W: Write>(
    writer: &mut Writer<W>,
    excipients: &[String],
) -> csv::Result<()> {
    writer.write_record([CATALOG_HEADER])?;
    for excipient in excipients {
        writer.write_record([excipient.as_str()])?;
    }
    Ok(())
}
