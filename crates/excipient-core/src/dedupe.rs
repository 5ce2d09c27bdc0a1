//! Order-preserving de-duplication of tokens and result rows.

use std::collections::{BTreeSet, HashSet};

use excipient_model::ResultRow;

/// Remove repeats, keeping the first occurrence of each value.
pub fn dedupe_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Keep the first row for each product value.
///
/// Product names are compared exactly; an empty product is a value like any
/// other.
pub fn dedupe_by_product(rows: Vec<ResultRow>) -> Vec<ResultRow> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.product.clone()))
        .collect()
}

/// Sorted, distinct excipient names across all rows.
pub fn excipient_catalog(rows: &[ResultRow]) -> Vec<String> {
    rows.iter()
        .flat_map(|row| row.excipients.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
