//! Tokenization of normalized text and excipient/note classification.

use excipient_model::Classified;

use crate::dedupe::dedupe_preserving_order;
use crate::rules::ExcipientRules;

/// Split normalized text into tokens and sort each into excipients or notes.
///
/// `product_terms` are the lowercase product-name words for the record; pass
/// an empty slice to disable the echo rule.
pub fn classify(
    normalized: &str,
    product_terms: &[String],
    rules: &ExcipientRules,
) -> Classified {
    let mut excipients = Vec::new();
    let mut notes = Vec::new();

    for token in tokenize(normalized, rules) {
        let mut remainder = token.as_str();
        if let Some(words) = &rules.contains_words
            && let Some(found) = words.find(remainder)
        {
            let preamble = remainder[..found.start()].trim();
            if has_letter(preamble) {
                notes.push(preamble.to_string());
            }
            remainder = remainder[found.end()..].trim();
        }
        let token = strip_leading_connective(remainder, rules);
        if !has_letter(token) {
            continue;
        }
        if is_note(token, product_terms, rules) {
            notes.push(token.to_string());
        } else {
            excipients.push(token.to_string());
        }
    }

    let notes = dedupe_preserving_order(notes);
    let excipients = dedupe_preserving_order(excipients)
        .into_iter()
        .filter(|excipient| !notes.contains(excipient))
        .collect();
    Classified { excipients, notes }
}

/// Separator split, then connective split for digit-free tokens.
fn tokenize(normalized: &str, rules: &ExcipientRules) -> Vec<String> {
    let mut tokens = Vec::new();
    for piece in normalized.split([';', ',']) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let splittable = !piece.chars().any(|ch| ch.is_ascii_digit());
        match &rules.connectives {
            Some(connectives) if splittable && connectives.is_match(piece) => {
                tokens.extend(
                    connectives
                        .split(piece)
                        .map(str::trim)
                        .filter(|part| has_letter(part))
                        .map(str::to_string),
                );
            }
            _ => {
                if has_letter(piece) {
                    tokens.push(piece.to_string());
                }
            }
        }
    }
    tokens
}

fn strip_leading_connective<'a>(token: &'a str, rules: &ExcipientRules) -> &'a str {
    match &rules.leading_connective {
        Some(leading) => match leading.find(token) {
            Some(found) => token[found.end()..].trim(),
            None => token,
        },
        None => token,
    }
}

fn is_note(token: &str, product_terms: &[String], rules: &ExcipientRules) -> bool {
    if rules
        .note_keywords
        .as_ref()
        .is_some_and(|keywords| keywords.is_match(token))
    {
        return true;
    }
    if rules.suspension.as_ref().is_some_and(|word| word.is_match(token))
        && token.split_whitespace().count() > rules.suspension_word_limit
    {
        return true;
    }
    if rules.note_patterns.iter().any(|pattern| pattern.is_match(token)) {
        return true;
    }
    let lowered = token.to_lowercase();
    product_terms.iter().any(|term| lowered.contains(term.as_str()))
}

fn has_letter(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExcipientRules {
        ExcipientRules::builtin().expect("builtin rules")
    }

    fn classify_plain(text: &str) -> Classified {
        classify(text, &[], &rules())
    }

    #[test]
    fn plain_list_is_all_excipients() {
        let classified = classify_plain("lactose, starch, magnesium stearate");
        assert_eq!(
            classified.excipients,
            vec!["lactose", "starch", "magnesium stearate"]
        );
        assert!(classified.notes.is_empty());
    }

    #[test]
    fn capsule_shell_is_a_note() {
        let classified = classify_plain("hard gelatin capsule shell");
        assert!(classified.excipients.is_empty());
        assert_eq!(classified.notes, vec!["hard gelatin capsule shell"]);
    }

    #[test]
    fn connectives_split_digit_free_tokens() {
        let classified = classify_plain("sucrose and glucose or fructose; water");
        assert_eq!(
            classified.excipients,
            vec!["sucrose", "glucose", "fructose", "water"]
        );
    }

    #[test]
    fn tokens_with_digits_are_not_split() {
        let classified = classify_plain("peg-3350 and water");
        assert_eq!(classified.excipients, vec!["peg-3350 and water"]);
    }

    #[test]
    fn connective_inside_word_is_ignored() {
        let classified = classify_plain("sodium carbonate, corn starch");
        assert_eq!(
            classified.excipients,
            vec!["sodium carbonate", "corn starch"]
        );
    }

    #[test]
    fn contains_splits_preamble_into_notes() {
        let classified = classify_plain("the shell contains gelatin; ink contain shellac");
        assert_eq!(classified.notes, vec!["the shell", "ink"]);
        assert_eq!(classified.excipients, vec!["gelatin", "shellac"]);
    }

    #[test]
    fn suspension_needs_more_than_two_words() {
        let classified = classify_plain("simethicone suspension; oral suspension for use");
        assert_eq!(classified.excipients, vec!["simethicone suspension"]);
        assert_eq!(classified.notes, vec!["oral suspension for use"]);

        let classified = classify_plain("simethicone emulsion suspension");
        assert_eq!(classified.notes, vec!["simethicone emulsion suspension"]);
    }

    #[test]
    fn product_echo_marks_note() {
        let terms = vec!["tylenol".to_string()];
        let classified = classify("tylenol extra, lactose", &terms, &rules());
        assert_eq!(classified.notes, vec!["tylenol extra"]);
        assert_eq!(classified.excipients, vec!["lactose"]);
    }

    #[test]
    fn digit_only_tokens_are_dropped() {
        let classified = classify_plain("-, lactose; ;");
        assert_eq!(classified.excipients, vec!["lactose"]);
        assert!(classified.notes.is_empty());
    }

    #[test]
    fn lists_are_unique_and_disjoint() {
        let classified =
            classify_plain("talc, talc, lactose contains starch; lactose; tablet; tablet");
        assert_eq!(classified.excipients, vec!["talc", "starch"]);
        assert_eq!(classified.notes, vec!["lactose", "tablet"]);
    }
}
