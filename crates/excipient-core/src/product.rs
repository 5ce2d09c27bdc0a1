//! Product name selection.

use excipient_model::Record;

/// Pick the product name for a record.
///
/// Returns the first candidate (trimmed) that contains a letter. When no
/// candidate does, the first candidate's raw value is returned unchanged,
/// which may be empty.
pub fn select_product<S: AsRef<str>>(record: &Record, candidates: &[S]) -> String {
    let values = record.values_for(candidates);
    select_from_values(&values)
}

/// Same as [`select_product`] over already-extracted values.
pub fn select_from_values(values: &[&str]) -> String {
    values
        .iter()
        .find(|value| value.chars().any(char::is_alphabetic))
        .map(|value| value.trim().to_string())
        .or_else(|| values.first().map(|value| (*value).to_string()))
        .unwrap_or_default()
}

/// Lowercase words from the product candidates that are long enough to be
/// distinctive. A token containing one of them echoes the product name.
pub fn product_terms(values: &[&str], min_len: usize) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for value in values {
        let lowered = value.to_lowercase();
        for word in lowered.split(|ch: char| !ch.is_alphanumeric()) {
            if word.chars().count() < min_len || !word.chars().any(char::is_alphabetic) {
                continue;
            }
            if !terms.iter().any(|term| term == word) {
                terms.push(word.to_string());
            }
        }
    }
    terms
}
