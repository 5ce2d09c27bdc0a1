//! Locating the inactive-ingredient list inside a free-text description.

use std::fmt;

use crate::rules::ExcipientRules;

/// How the ingredient list is found in a description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LocatorStrategy {
    /// One fixed label; the list runs from its colon to the end of text.
    SingleLabel,
    /// Every label occurrence opens a segment that ends at the next label.
    #[default]
    MultiLabel,
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleLabel => f.write_str("single-label"),
            Self::MultiLabel => f.write_str("multi-label"),
        }
    }
}

/// Extract the excipient text from `description`.
///
/// Returns an empty string when no label is present; the caller decides on
/// a fallback.
pub fn locate_excipients(
    description: &str,
    strategy: LocatorStrategy,
    rules: &ExcipientRules,
) -> String {
    let located = match strategy {
        LocatorStrategy::SingleLabel => single_label_text(description, rules),
        LocatorStrategy::MultiLabel => multi_label_text(description, rules),
    };
    match located {
        Some(text) => clean_located(&text, rules),
        None => String::new(),
    }
}

fn single_label_text(description: &str, rules: &ExcipientRules) -> Option<String> {
    rules
        .single_label
        .captures(description)
        .and_then(|captures| captures.get(1))
        .map(|list| list.as_str().to_string())
}

fn multi_label_text(description: &str, rules: &ExcipientRules) -> Option<String> {
    let labels: Vec<_> = rules.labels.find_iter(description).collect();
    if labels.is_empty() {
        return None;
    }
    let segments: Vec<&str> = labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let end = labels
                .get(idx + 1)
                .map_or(description.len(), |next| next.start());
            strip_connective(&description[label.end()..end], rules)
        })
        .filter(|segment| !segment.is_empty())
        .collect();
    Some(segments.join(" "))
}

/// Drop the text between a label and its list.
///
/// A colon that comes before any list verb ends the connective; otherwise
/// the first list verb does. Leading punctuation and whitespace are then
/// trimmed, except an opening parenthesis.
fn strip_connective<'a>(segment: &'a str, rules: &ExcipientRules) -> &'a str {
    let colon = segment.find(':');
    let verb = rules
        .list_verbs
        .as_ref()
        .and_then(|verbs| verbs.find(segment));
    let rest = match (colon, verb) {
        (Some(colon), Some(verb)) if colon < verb.start() => &segment[colon + 1..],
        (Some(colon), None) => &segment[colon + 1..],
        (_, Some(verb)) => &segment[verb.end()..],
        (None, None) => segment,
    };
    rest.trim_start_matches(|ch: char| {
        ch.is_whitespace() || (ch.is_ascii_punctuation() && ch != '(')
    })
    .trim_end()
}

/// Cut trailing unrelated subsections and strip explanatory clauses.
fn clean_located(text: &str, rules: &ExcipientRules) -> String {
    let kept = match rules
        .truncate_markers
        .as_ref()
        .and_then(|markers| markers.find(text))
    {
        Some(marker) => &text[..marker.start()],
        None => text,
    };
    let mut cleaned = kept.to_string();
    for removal in &rules.removals {
        cleaned = removal.replace_all(&cleaned, " ").into_owned();
    }
    cleaned.trim().to_string()
}
