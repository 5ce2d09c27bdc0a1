//! CSV output for excipient extraction results.

mod error;
mod writer;

pub use error::{OutputError, Result};
pub use writer::{CATALOG_HEADER, OutputLayout, write_catalog, write_results};
