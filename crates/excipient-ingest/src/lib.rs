//! Spreadsheet ingestion for excipient extraction.
//!
//! Reads the first worksheet of an `.xlsx` workbook, or a `.csv` file, into
//! [`Record`](excipient_model::Record)s. The first row is the header; blank
//! header cells are named `col{index}`; ragged rows are padded or truncated
//! to the header width.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use excipient_ingest::load_records;
//!
//! let records = load_records(Path::new("input.xlsx"))?;
//! ```

mod csv_reader;
mod error;
mod loader;
mod table;
mod xlsx;

// === Error Types ===
pub use error::{IngestError, Result};

// === Loading ===
pub use csv_reader::read_csv_table;
pub use loader::{SourceFormat, load_records};
pub use table::RawTable;
pub use xlsx::read_xlsx_table;
