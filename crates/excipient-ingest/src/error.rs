//! Error types for spreadsheet ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a spreadsheet into records.
///
/// Every variant is fatal for the run: a source that cannot be read as a
/// table produces no output at all.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file does not exist.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Extension is neither a workbook nor CSV.
    #[error("unsupported spreadsheet format: {path}")]
    UnsupportedFormat { path: PathBuf },

    // === Workbook Errors ===
    /// The workbook is not a readable zip archive.
    #[error("invalid workbook archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// A required part is absent from the workbook.
    #[error("workbook {path} has no part named {part}")]
    MissingPart { path: PathBuf, part: String },

    /// A workbook part is not well-formed XML.
    #[error("malformed XML in {part} of {path}: {message}")]
    Xml {
        path: PathBuf,
        part: String,
        message: String,
    },

    /// Workbook contents are structurally wrong (bad cell reference, bad index).
    #[error("invalid workbook {path}: {reason}")]
    FileFormat { path: PathBuf, reason: String },

    // === CSV Errors ===
    /// CSV parsing failed.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },
}

impl IngestError {
    pub(crate) fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FileFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
