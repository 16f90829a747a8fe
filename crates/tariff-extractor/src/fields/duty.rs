//! Duty rate ("free" or "N percent ad valorem")

use crate::text::{first_match, Matcher};
use regex::Regex;
use std::sync::LazyLock;

static RE_RATE_WILL_BE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)the rate of duty will be\s+(\d+(?:\.\d+)?\s*percent\s+ad\s+valorem|free)\b")
        .expect("valid duty phrase regex")
});
static RE_AD_VALOREM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*percent\s+ad\s+valorem\b")
        .expect("valid ad valorem regex")
});
static RE_FREE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfree\b").expect("valid free regex"));

static DUTY: &[Matcher] = &[
    Matcher::Capture(&RE_RATE_WILL_BE),
    Matcher::Func(any_ad_valorem),
    Matcher::Func(any_free),
];

/// Extract the duty rate
///
/// Prefers "the rate of duty will be ...", then any "N percent ad valorem"
/// (reported in that canonical spelling), then the bare word "free".
pub fn extract_duty_rate(text: &str) -> Option<String> {
    first_match(DUTY, text)
}

fn any_ad_valorem(text: &str) -> Option<String> {
    RE_AD_VALOREM
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|rate| format!("{} percent ad valorem", rate.as_str()))
}

fn any_free(text: &str) -> Option<String> {
    RE_FREE.is_match(text).then(|| "free".to_string())
}
