//! Compiled form of a [`Vocabulary`].
//!
//! Every stage of the pipeline takes `&ExcipientRules`; nothing reads the
//! vocabulary tables directly, so each stage can be tested against a
//! hand-built vocabulary.

use excipient_model::FieldAliases;
use regex::Regex;

use crate::error::{Result, VocabularyError};
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone)]
pub struct ExcipientRules {
    pub fields: FieldAliases,
    pub(crate) single_label: Regex,
    pub(crate) labels: Regex,
    pub(crate) list_verbs: Option<Regex>,
    pub(crate) truncate_markers: Option<Regex>,
    pub(crate) removals: Vec<Regex>,
    pub(crate) units: Option<Regex>,
    pub(crate) note_keywords: Option<Regex>,
    pub(crate) note_patterns: Vec<Regex>,
    pub(crate) connectives: Option<Regex>,
    pub(crate) leading_connective: Option<Regex>,
    pub(crate) contains_words: Option<Regex>,
    pub(crate) suspension: Option<Regex>,
    pub(crate) suspension_word_limit: usize,
    pub product_echo: bool,
    pub product_echo_min_len: usize,
}

impl ExcipientRules {
    /// Compile the vocabulary tables into matchers.
    ///
    /// # Errors
    ///
    /// Fails when a configured pattern is not a valid regex or when a table
    /// that the locator cannot work without (labels) is empty.
    pub fn compile(vocabulary: &Vocabulary) -> Result<Self> {
        let locator = &vocabulary.locator;
        let classifier = &vocabulary.classifier;
        if locator.labels.is_empty() {
            return Err(VocabularyError::EmptyField {
                field: "locator.labels",
            });
        }
        let single_label_pattern = format!(r"(?is){}\s*(.*)", locator.single_label);
        let single_label = Regex::new(&single_label_pattern).map_err(|source| {
            VocabularyError::pattern("locator.single_label", &locator.single_label, source)
        })?;
        let labels = phrase_alternation("locator.labels", &locator.labels)?
            .ok_or(VocabularyError::EmptyField {
                field: "locator.labels",
            })?;
        let list_verbs = phrase_alternation("locator.list_verbs", &locator.list_verbs)?;
        let truncate_markers =
            pattern_alternation("locator.truncate_markers", &locator.truncate_markers)?;
        let removals = compile_each("locator.removals", &locator.removals)?;
        let units = unit_pattern(&vocabulary.normalizer.units)?;
        let note_keywords =
            phrase_alternation("classifier.note_keywords", &classifier.note_keywords)?;
        let note_patterns = compile_each("classifier.note_patterns", &classifier.note_patterns)?;
        let connectives = phrase_alternation("classifier.connectives", &classifier.connectives)?;
        let leading_connective = if classifier.connectives.is_empty() {
            None
        } else {
            let pattern = format!(r"(?i)^(?:{})\s+", phrase_body(&classifier.connectives));
            let regex = Regex::new(&pattern).map_err(|source| {
                VocabularyError::pattern("classifier.connectives", &pattern, source)
            })?;
            Some(regex)
        };
        let contains_words =
            phrase_alternation("classifier.contains_words", &classifier.contains_words)?;
        let suspension = phrase_alternation(
            "classifier.suspension_word",
            std::slice::from_ref(&classifier.suspension_word),
        )?;

        Ok(Self {
            fields: vocabulary.fields.clone(),
            single_label,
            labels,
            list_verbs,
            truncate_markers,
            removals,
            units,
            note_keywords,
            note_patterns,
            connectives,
            leading_connective,
            contains_words,
            suspension,
            suspension_word_limit: classifier.suspension_word_limit,
            product_echo: classifier.product_echo,
            product_echo_min_len: classifier.product_echo_min_len,
        })
    }

    /// Rules compiled from the built-in vocabulary.
    pub fn builtin() -> Result<Self> {
        Self::compile(&Vocabulary::builtin()?)
    }
}

/// Escape a literal phrase; inner spaces match any whitespace run.
fn phrase_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Alternation body, longest phrases first so overlapping entries prefer
/// the more specific one.
fn phrase_body(phrases: &[String]) -> String {
    let mut sorted: Vec<&String> = phrases.iter().filter(|p| !p.trim().is_empty()).collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted
        .into_iter()
        .map(|phrase| phrase_pattern(phrase))
        .collect::<Vec<_>>()
        .join("|")
}

/// Case-insensitive whole-word matcher for any of the phrases.
fn phrase_alternation(field: &'static str, phrases: &[String]) -> Result<Option<Regex>> {
    let body = phrase_body(phrases);
    if body.is_empty() {
        return Ok(None);
    }
    let pattern = format!(r"(?i)\b(?:{body})\b");
    Regex::new(&pattern)
        .map(Some)
        .map_err(|source| VocabularyError::pattern(field, &pattern, source))
}

fn pattern_alternation(field: &'static str, patterns: &[String]) -> Result<Option<Regex>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    for pattern in patterns {
        Regex::new(pattern).map_err(|source| VocabularyError::pattern(field, pattern, source))?;
    }
    let combined = format!(
        "(?i)(?:{})",
        patterns
            .iter()
            .map(|pattern| format!("(?:{pattern})"))
            .collect::<Vec<_>>()
            .join("|")
    );
    Regex::new(&combined)
        .map(Some)
        .map_err(|source| VocabularyError::pattern(field, &combined, source))
}

fn compile_each(field: &'static str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("(?i){pattern}"))
                .map_err(|source| VocabularyError::pattern(field, pattern, source))
        })
        .collect()
}

/// Quantity followed by a unit. The quantity may be glued to a preceding
/// word (`lactose_5mg`); leftmost matching still takes the whole digit run.
/// Word-like units must end on a word boundary; symbol units such as `%`
/// cannot, since `\b` never follows them before whitespace.
fn unit_pattern(units: &[String]) -> Result<Option<Regex>> {
    let (words, symbols): (Vec<&String>, Vec<&String>) = units
        .iter()
        .filter(|unit| !unit.trim().is_empty())
        .partition(|unit| unit.chars().last().is_some_and(char::is_alphanumeric));
    let quantity = r"\d+(?:\.\d+)?\s*";
    let mut branches = Vec::new();
    if !words.is_empty() {
        let body = words
            .iter()
            .map(|unit| regex::escape(unit))
            .collect::<Vec<_>>()
            .join("|");
        branches.push(format!(r"{quantity}(?:{body})\b"));
    }
    if !symbols.is_empty() {
        let body = symbols
            .iter()
            .map(|unit| regex::escape(unit))
            .collect::<Vec<_>>()
            .join("|");
        branches.push(format!(r"{quantity}(?:{body})"));
    }
    if branches.is_empty() {
        return Ok(None);
    }
    let pattern = format!("(?i){}", branches.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|source| VocabularyError::pattern("normalizer.units", &pattern, source))
}
