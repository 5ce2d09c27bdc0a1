//! Per-record pipeline: product selection, locating, normalization and
//! classification.

use std::time::Instant;

use excipient_model::{Classified, ExcipientSource, Record, ResultRow};
use tracing::{debug, info, warn};

use crate::classifier::classify;
use crate::dedupe::dedupe_by_product;
use crate::locator::{LocatorStrategy, locate_excipients};
use crate::normalizer::normalize;
use crate::product::{product_terms, select_from_values};
use crate::rules::ExcipientRules;

#[derive(Debug, Clone, Copy)]
pub struct ProcessingOptions {
    pub strategy: LocatorStrategy,
    /// Treat tokens that repeat the product name as notes. Only takes
    /// effect when the vocabulary also enables it.
    pub product_echo: bool,
    /// Keep only the first row per product value.
    pub dedupe_products: bool,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            strategy: LocatorStrategy::default(),
            product_echo: true,
            dedupe_products: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExcipientPipeline<'a> {
    pub rules: &'a ExcipientRules,
    pub options: ProcessingOptions,
}

impl<'a> ExcipientPipeline<'a> {
    pub fn new(rules: &'a ExcipientRules) -> Self {
        Self {
            rules,
            options: ProcessingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProcessingOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the result row for one record. Never fails: missing columns
    /// read as empty and yield an empty row.
    pub fn process_record(&self, record: &Record) -> ResultRow {
        let fields = &self.rules.fields;
        let candidates = record.values_for(&fields.product);
        let product = select_from_values(&candidates);

        let description = record.first_non_empty(&fields.description);
        let located = locate_excipients(description, self.options.strategy, self.rules);
        let (text, source) = if located.is_empty() {
            let literal = record.first_non_empty(&fields.excipients);
            if literal.trim().is_empty() {
                (String::new(), ExcipientSource::Missing)
            } else {
                (literal.to_string(), ExcipientSource::ExcipientsField)
            }
        } else {
            (located, ExcipientSource::Description)
        };

        let classified = if text.is_empty() {
            Classified::default()
        } else {
            let normalized = normalize(&text, self.options.strategy, self.rules);
            let terms = if self.echo_enabled() {
                product_terms(&candidates, self.rules.product_echo_min_len)
            } else {
                Vec::new()
            };
            classify(&normalized, &terms, self.rules)
        };
        ResultRow::new(product, classified, source)
    }

    /// Process records in order, one row each (unless product de-duplication
    /// is enabled).
    pub fn process_records(&self, records: &[Record]) -> Vec<ResultRow> {
        let start = Instant::now();
        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let row = self.process_record(record);
            debug!(
                index,
                product = %row.product,
                source = %row.source,
                excipient_count = row.excipients.len(),
                note_count = row.notes.len(),
                "processed record"
            );
            if row.source == ExcipientSource::Missing {
                warn!(index, product = %row.product, "no excipient text found");
            }
            rows.push(row);
        }
        let processed = rows.len();
        if self.options.dedupe_products {
            rows = dedupe_by_product(rows);
        }
        info!(
            strategy = %self.options.strategy,
            record_count = processed,
            row_count = rows.len(),
            duration_ms = start.elapsed().as_millis(),
            "processed records"
        );
        rows
    }

    fn echo_enabled(&self) -> bool {
        self.options.product_echo && self.rules.product_echo
    }
}
