//! CLI library components for drug excipient extraction.

pub mod logging;
pub mod pipeline;
pub mod types;
