//! Product description: the narrative paragraph describing the merchandise

use crate::config::ExtractorConfig;
use crate::text::{collapse_whitespace, Matcher};
use regex::Regex;
use std::sync::LazyLock;

macro_rules! opener {
    ($name:ident, $pattern:literal) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(concat!(r"(?is)\b(", $pattern, r".*)")).expect("valid opener regex")
        });
    };
}

opener!(RE_THE_SAMPLE, r"The sample,");
opener!(RE_SUBJECT_MERCHANDISE, r"The subject merchandise is\b");
opener!(RE_ARTICLES, r"The articles under consideration\b");
opener!(RE_PRODUCT, r"The product under consideration\b");
opener!(RE_ITEM, r"The item under consideration\b");

static OPENERS: &[Matcher] = &[
    Matcher::Capture(&RE_THE_SAMPLE),
    Matcher::Capture(&RE_SUBJECT_MERCHANDISE),
    Matcher::Capture(&RE_ARTICLES),
    Matcher::Capture(&RE_PRODUCT),
    Matcher::Capture(&RE_ITEM),
];

// A paragraph break or sentence end, followed by the start of the analysis.
// The trigger is consumed here; only the match start is used as the cut.
static RE_STOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?:\n\s*\n\s*|\.\s+)(?:",
        r"In your ruling request",
        r"|In your letter,\s+you propose",
        r"|You\s+(?:have\s+)?(?:suggested|proposed)\b",
        r"|This office\s+(?:agrees|disagrees?)",
        r"|Heading\s+\d{4}",
        r"|The applicable\s+(?:subheading|tariff classification)",
        r"|The rate of duty",
        r"|Duty rates are provided",
        r"|This ruling is being issued",
        r"|A copy of the ruling",
        r"|If you have any questions",
        r"|Sincerely,",
        r")"
    ))
    .expect("valid description stop regex")
});

/// Extract a single cleaned product description
///
/// Starts at the first narrative opener (in table order) and runs to the
/// first break that precedes the classification analysis. The result is
/// whitespace-collapsed, curly quotes are straightened, and a period is
/// appended when the text ends on a letter or digit. Results of
/// `min_description_len` characters or fewer are dropped as accidental hits.
pub fn extract_product_description(text: &str, config: &ExtractorConfig) -> Option<String> {
    let tail = OPENERS.iter().find_map(|m| m.find(text))?;

    let chunk = match RE_STOP.find(&tail) {
        Some(stop) => &tail[..stop.start()],
        None => tail.as_str(),
    };

    let mut chunk = straighten_quotes(&collapse_whitespace(chunk));
    if chunk.chars().last().is_some_and(char::is_alphanumeric) {
        chunk.push('.');
    }

    (chunk.chars().count() > config.min_description_len).then_some(chunk)
}

fn straighten_quotes(s: &str) -> String {
    s.replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}
