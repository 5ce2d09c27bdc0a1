//! Normalization of located excipient text into a delimited candidate list.
//!
//! The rewrite order is fixed:
//!
//! 1. remove parenthetical asides
//! 2. collapse whitespace
//! 3. `No. 6` → `No 6`, `and/or` → `and or`
//! 4. remove quantity + unit
//! 5. sentence periods → semicolons (before step 4 for the single-label
//!    strategy)
//! 6. lowercase, replace anything outside `[a-z0-9,;\s-]` with a space, then
//!    remove quantity + unit again
//! 7. remove standalone digit runs
//! 8. collapse whitespace, tighten separators, trim
//!
//! Units are removed while they are still recognisable words, and asides go
//! first so quantities inside them never reach the unit pass. The second unit
//! pass catches quantities that only become separable once a neighbouring
//! character is replaced (`5mgé`).

use std::sync::LazyLock;

use regex::Regex;

use crate::locator::LocatorStrategy;
use crate::rules::ExcipientRules;

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").expect("Invalid parenthetical regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static NUMBER_ABBREVIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(no)\.\s*(\d)").expect("Invalid number regex"));

static AND_OR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\band/or\b").expect("Invalid and/or regex"));

static SENTENCE_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(?:\s+|$)").expect("Invalid period regex"));

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9,;\s-]").expect("Invalid character class regex"));

static STANDALONE_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]+\b").expect("Invalid digit regex"));

static SPACE_BEFORE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,;])").expect("Invalid separator regex"));

/// Normalize located excipient text.
pub fn normalize(text: &str, strategy: LocatorStrategy, rules: &ExcipientRules) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut value = strip_parentheticals(text);
    value = collapse_whitespace(&value);
    value = NUMBER_ABBREVIATION.replace_all(&value, "${1} ${2}").into_owned();
    value = AND_OR.replace_all(&value, "and or").into_owned();
    match strategy {
        LocatorStrategy::SingleLabel => {
            value = periods_to_semicolons(&value);
            value = strip_quantities(&value, rules);
        }
        LocatorStrategy::MultiLabel => {
            value = strip_quantities(&value, rules);
            value = periods_to_semicolons(&value);
        }
    }
    value = DISALLOWED
        .replace_all(&value.to_lowercase(), " ")
        .into_owned();
    value = strip_quantities(&value, rules);
    value = STANDALONE_DIGITS.replace_all(&value, " ").into_owned();
    tidy(&value)
}

/// Remove innermost asides until none remain, so nested parentheses vanish
/// as a whole.
fn strip_parentheticals(text: &str) -> String {
    let mut value = text.to_string();
    while PARENTHETICAL.is_match(&value) {
        value = PARENTHETICAL.replace_all(&value, "").into_owned();
    }
    value
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

fn strip_quantities(text: &str, rules: &ExcipientRules) -> String {
    match &rules.units {
        Some(units) => units.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

fn periods_to_semicolons(text: &str) -> String {
    SENTENCE_PERIOD.replace_all(text, "; ").into_owned()
}

fn tidy(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    let tightened = SPACE_BEFORE_SEPARATOR.replace_all(&collapsed, "${1}");
    tightened
        .trim_matches(|ch: char| ch.is_whitespace() || ch == ',' || ch == ';')
        .to_string()
}
