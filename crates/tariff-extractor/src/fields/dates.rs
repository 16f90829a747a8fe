//! Submission and reply dates

use crate::config::ExtractorConfig;
use crate::text::{first_match, head_lines, Matcher};
use regex::Regex;
use std::sync::LazyLock;

static RE_IN_YOUR_LETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)in your letter dated\s+([A-Za-z]+\s+\d{1,2},\s+\d{4})")
        .expect("valid submitted-date regex")
});
static RE_YOUR_LETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)your letter dated\s+([A-Za-z]+\s+\d{1,2},\s+\d{4})")
        .expect("valid submitted-date regex")
});
static RE_LONG_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([A-Za-z]+\s+\d{1,2},\s+\d{4})\b").expect("valid long-date regex")
});

static SUBMITTED: &[Matcher] = &[
    Matcher::Capture(&RE_IN_YOUR_LETTER),
    Matcher::Capture(&RE_YOUR_LETTER),
];

static REPLIED: &[Matcher] = &[Matcher::Capture(&RE_LONG_DATE)];

/// Extract `(date_submitted, date_replied)` as written ("March 4, 2021")
///
/// The submitted date comes from "(in) your letter dated ...". The reply
/// date is the first long-form date in the letter header: the text before
/// the first "Dear", or the first `header_line_limit` lines when there is
/// no salutation. Dates are not checked against the calendar.
pub fn extract_dates(
    text: &str,
    config: &ExtractorConfig,
) -> (Option<String>, Option<String>) {
    let submitted = first_match(SUBMITTED, text);

    let header = match text.split_once("Dear") {
        Some((before, _)) => before.to_string(),
        None => head_lines(text, config.header_line_limit),
    };
    let replied = first_match(REPLIED, &header);

    (submitted, replied)
}
