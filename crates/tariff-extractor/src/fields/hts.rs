//! Tariff (HTS) codes: the requester's suggestion and the ruling's decision

use crate::text::{first_match, Matcher};
use regex::Regex;
use std::sync::LazyLock;

macro_rules! hts_phrase {
    ($name:ident, $pattern:literal) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(concat!(r"(?is)", $pattern, r"\s+(\d{4}\.\d{2}\.\d{4})\b"))
                .expect("valid HTS phrase regex")
        });
    };
}

// Suggestions, only when attributed to the requester.
hts_phrase!(RE_YOU_SUGGEST, r"\byou suggest\b.*?\bunder");
hts_phrase!(RE_IN_YOUR_REQUEST, r"\bin your ruling request\b.*?\bunder");
hts_phrase!(RE_YOU_HAVE_SUGGESTED, r"\byou have suggested\b.*?\bsubheading");
hts_phrase!(RE_YOU_PROPOSED, r"\byou proposed\b.*?\bsubheading");
hts_phrase!(RE_YOU_PROPOSE_CLASSIFYING, r"\byou propose classifying\b.*?\bsubheading");

// Decisions.
hts_phrase!(RE_SUBHEADING_WILL_BE, r"\bthe applicable subheading\b.*?\bwill be");
hts_phrase!(RE_SUBHEADING_IS, r"\bthe applicable subheading\b.*?\bis");
hts_phrase!(RE_CLASSIFICATION_WILL_BE, r"\bthe applicable tariff classification\b.*?\bwill be");
hts_phrase!(RE_CLASSIFICATION_IS, r"\bthe applicable tariff classification\b.*?\bis");
hts_phrase!(RE_SUBHEADING_FOR_WILL_BE, r"\bthe applicable subheading for\b.*?\bwill be");

static RE_ANY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\.\d{2}\.\d{4}\b").expect("valid HTS code regex"));

static SUGGESTION: &[Matcher] = &[
    Matcher::Capture(&RE_YOU_SUGGEST),
    Matcher::Capture(&RE_IN_YOUR_REQUEST),
    Matcher::Capture(&RE_YOU_HAVE_SUGGESTED),
    Matcher::Capture(&RE_YOU_PROPOSED),
    Matcher::Capture(&RE_YOU_PROPOSE_CLASSIFYING),
];

static DECISION: &[Matcher] = &[
    Matcher::Capture(&RE_SUBHEADING_WILL_BE),
    Matcher::Capture(&RE_SUBHEADING_IS),
    Matcher::Capture(&RE_CLASSIFICATION_WILL_BE),
    Matcher::Capture(&RE_CLASSIFICATION_IS),
    Matcher::Capture(&RE_SUBHEADING_FOR_WILL_BE),
    Matcher::Func(last_unique_code),
];

/// Extract `(hts_suggestion, hts_decision)` as `####.##.####` codes
///
/// The decision falls back to the last distinct code in the letter, since
/// rulings state the final classification near the end. The suggestion has
/// no fallback: letters often cite several unrelated codes, and guessing one
/// produces false positives.
pub fn extract_hts_codes(text: &str) -> (Option<String>, Option<String>) {
    (first_match(SUGGESTION, text), first_match(DECISION, text))
}

/// Last entry of the distinct codes, ordered by first appearance
fn last_unique_code(text: &str) -> Option<String> {
    let mut seen: Vec<&str> = Vec::new();
    for m in RE_ANY_CODE.find_iter(text) {
        if !seen.contains(&m.as_str()) {
            seen.push(m.as_str());
        }
    }
    seen.last().map(|code| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_phrase_without_suggestion() {
        let text = "The sample was previously imported under 6301.90.0010.\n\n\
                    The applicable subheading for the pasta will be 1902.19.2090, \
                    Harmonized Tariff Schedule of the United States (HTSUS).";
        let (suggestion, decision) = extract_hts_codes(text);
        assert_eq!(suggestion, None);
        assert_eq!(decision.as_deref(), Some("1902.19.2090"));
    }

    #[test]
    fn test_suggestion_spans_lines() {
        let text = "In your ruling request, you suggest classification of the blanket\n\
                    under 6301.90.0010, HTSUS. We disagree.\n\
                    The applicable subheading for the blanket will be 6301.40.0020.";
        let (suggestion, decision) = extract_hts_codes(text);
        assert_eq!(suggestion.as_deref(), Some("6301.90.0010"));
        assert_eq!(decision.as_deref(), Some("6301.40.0020"));
    }

    #[test]
    fn test_suggestion_priority_order() {
        // "you proposed" appears first in the text, but "you have suggested"
        // ranks higher in the table.
        let text = "You proposed classification in subheading 7326.19.0080. \
                    You have suggested classification in subheading 7326.90.8688.";
        let (suggestion, _) = extract_hts_codes(text);
        assert_eq!(suggestion.as_deref(), Some("7326.90.8688"));
    }

    #[test]
    fn test_propose_classifying() {
        let text = "You propose classifying the machine under subheading 8479.81.0000.";
        let (suggestion, _) = extract_hts_codes(text);
        assert_eq!(suggestion.as_deref(), Some("8479.81.0000"));
    }

    #[test]
    fn test_tariff_classification_is() {
        let text = "The applicable tariff classification for the cart is 8716.80.5090, HTSUS.";
        let (_, decision) = extract_hts_codes(text);
        assert_eq!(decision.as_deref(), Some("8716.80.5090"));
    }

    #[test]
    fn test_fallback_is_last_unique_code() {
        let text = "Codes 1111.11.1111 and 2222.22.2222 were considered; 1111.11.1111 again.";
        let (suggestion, decision) = extract_hts_codes(text);
        assert_eq!(suggestion, None);
        assert_eq!(decision.as_deref(), Some("2222.22.2222"));
    }

    #[test]
    fn test_no_codes() {
        assert_eq!(extract_hts_codes("No classification here."), (None, None));
    }

    #[test]
    fn test_partial_code_is_ignored() {
        assert_eq!(last_unique_code("heading 6301 and 6301.90"), None);
    }
}
