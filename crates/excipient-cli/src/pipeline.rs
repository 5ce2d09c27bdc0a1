//! Extraction pipeline with explicit stages.
//!
//! 1. **Vocabulary**: resolve and compile the rule tables
//! 2. **Ingest**: read the spreadsheet into records
//! 3. **Process**: locate, normalize and classify each record
//! 4. **Output**: write the result table or the excipient catalog
//!
//! Loading and processing finish before any file is written, so a failed
//! load never leaves a partial output behind.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use excipient_core::{
    ExcipientPipeline, ExcipientRules, ProcessingOptions, excipient_catalog, load_vocabulary,
};
use excipient_ingest::load_records;
use excipient_model::ResultRow;
use excipient_output::{OutputLayout, write_catalog, write_results};

use crate::types::{CatalogResult, RunResult, SourceCounts};

/// Settings for a result-table run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub vocabulary: Option<PathBuf>,
    pub options: ProcessingOptions,
    pub layout: OutputLayout,
}

/// Settings for a catalog run.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub vocabulary: Option<PathBuf>,
    pub options: ProcessingOptions,
}

// ============================================================================
// Stage 1: Vocabulary
// ============================================================================

/// Resolve the vocabulary (explicit path, environment, built-in) and compile
/// it.
pub fn load_rules(vocabulary: Option<&Path>) -> Result<ExcipientRules> {
    let tables = load_vocabulary(vocabulary).context("load vocabulary")?;
    ExcipientRules::compile(&tables).context("compile vocabulary")
}

// ============================================================================
// Stages 2 and 3: Ingest and process
// ============================================================================

/// Load `input` and run every record through the pipeline.
pub fn extract_rows(
    input: &Path,
    rules: &ExcipientRules,
    options: ProcessingOptions,
) -> Result<(usize, Vec<ResultRow>)> {
    let start = Instant::now();
    let records =
        load_records(input).with_context(|| format!("load records from {}", input.display()))?;
    info!(
        record_count = records.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    let rows = ExcipientPipeline::new(rules)
        .with_options(options)
        .process_records(&records);
    Ok((records.len(), rows))
}

// ============================================================================
// Stage 4: Output
// ============================================================================

/// Produce the per-record result table.
pub fn run_extraction(config: &RunConfig) -> Result<RunResult> {
    let span = info_span!("run", input = %config.input.display());
    let _guard = span.enter();

    let rules = load_rules(config.vocabulary.as_deref())?;
    let (records, rows) = extract_rows(&config.input, &rules, config.options)?;

    let start = Instant::now();
    write_results(&config.output, &rows, config.layout)
        .with_context(|| format!("write results to {}", config.output.display()))?;
    info!(
        row_count = rows.len(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );

    Ok(RunResult {
        input: config.input.clone(),
        output: config.output.clone(),
        strategy: config.options.strategy,
        layout: config.layout,
        records,
        rows: rows.len(),
        sources: SourceCounts::tally(&rows),
        empty_rows: rows.iter().filter(|row| row.is_empty()).count(),
        unique_excipients: excipient_catalog(&rows).len(),
    })
}

/// Produce the sorted, distinct excipient catalog.
pub fn run_catalog(config: &CatalogConfig) -> Result<CatalogResult> {
    let span = info_span!("catalog", input = %config.input.display());
    let _guard = span.enter();

    let rules = load_rules(config.vocabulary.as_deref())?;
    let (records, rows) = extract_rows(&config.input, &rules, config.options)?;
    let catalog = excipient_catalog(&rows);
    write_catalog(&config.output, &catalog)
        .with_context(|| format!("write catalog to {}", config.output.display()))?;

    Ok(CatalogResult {
        input: config.input.clone(),
        output: config.output.clone(),
        strategy: config.options.strategy,
        records,
        excipients: catalog.len(),
    })
}
