use std::path::PathBuf;

use excipient_core::LocatorStrategy;
use excipient_model::{ExcipientSource, ResultRow};
use excipient_output::OutputLayout;

#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub strategy: LocatorStrategy,
    pub layout: OutputLayout,
    pub records: usize,
    pub rows: usize,
    pub sources: SourceCounts,
    pub empty_rows: usize,
    pub unique_excipients: usize,
}

#[derive(Debug)]
pub struct CatalogResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub strategy: LocatorStrategy,
    pub records: usize,
    pub excipients: usize,
}

/// How many rows took their excipient text from each source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCounts {
    pub description: usize,
    pub excipients_field: usize,
    pub missing: usize,
}

impl SourceCounts {
    pub fn tally(rows: &[ResultRow]) -> Self {
        let mut counts = Self::default();
        for row in rows {
            match row.source {
                ExcipientSource::Description => counts.description += 1,
                ExcipientSource::ExcipientsField => counts.excipients_field += 1,
                ExcipientSource::Missing => counts.missing += 1,
            }
        }
        counts
    }
}
