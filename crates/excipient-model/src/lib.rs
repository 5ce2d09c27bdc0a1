//! Data model shared by the excipient extraction crates.

pub mod fields;
pub mod record;
pub mod result;

pub use fields::FieldAliases;
pub use record::Record;
pub use result::{Classified, ExcipientSource, LIST_SEPARATOR, ResultRow};
