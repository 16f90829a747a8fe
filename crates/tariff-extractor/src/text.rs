//! Text normalization and ordered pattern matching
//!
//! Ruling letters arrive with inconsistent whitespace (HTML exports, legacy
//! `.doc` files, PDF text). Everything here is total: any string input gives
//! a result, and "not found" is `None`.

use regex::Regex;
use std::sync::LazyLock;
use tariff_domain::DocumentText;

static RE_HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid horizontal whitespace regex"));
static RE_BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline run regex"));

/// Collapse every whitespace run to a single space and trim both ends
///
/// # Examples
///
/// ```
/// use tariff_extractor::text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("Hello   \n\n\tWorld!"), "Hello World!");
/// assert_eq!(collapse_whitespace(""), "");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a document for body searches
///
/// CR becomes LF (so a CRLF pair becomes a blank line), space/tab runs become
/// one space, three or more newlines become exactly two, and the ends are
/// trimmed. Idempotent.
pub fn normalize_text(s: &str) -> String {
    let text = s.replace('\r', "\n");
    let text = RE_HORIZONTAL_WS.replace_all(&text, " ");
    let text = RE_BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Line-structured view: trimmed lines, empty lines dropped
pub fn pretty_text(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build both text views of a document from its raw text
pub fn document_from_raw(id: &str, raw: &str) -> DocumentText {
    DocumentText::new(id, normalize_text(raw), pretty_text(raw))
}

/// One entry in an ordered precedence table
///
/// Extractors express "try this phrasing first, then that one" as a slice
/// of matchers handed to [`first_match`]; the slice order is the tie-break.
pub enum Matcher {
    /// Capture group 1 of the leftmost match
    Capture(&'static LazyLock<Regex>),
    /// Hand-written matcher, for heuristics the regex engine cannot express
    /// (it has no lookaround)
    Func(fn(&str) -> Option<String>),
}

impl Matcher {
    /// Run this matcher against `text`
    pub fn find(&self, text: &str) -> Option<String> {
        match self {
            Matcher::Capture(regex) => regex
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
            Matcher::Func(f) => f(text),
        }
    }
}

/// Try each matcher in order and return the first hit, whitespace-collapsed
///
/// Case-insensitivity is part of each pattern (`(?i)`), so tables can mix
/// case-sensitive and insensitive phrasings.
pub fn first_match(matchers: &[Matcher], text: &str) -> Option<String> {
    matchers
        .iter()
        .find_map(|m| m.find(text))
        .map(|s| collapse_whitespace(&s))
}

/// First `limit` lines of `text`, joined back with newlines
pub(crate) fn head_lines(text: &str, limit: usize) -> String {
    text.lines().take(limit).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    static RE_CODE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)code\s+(\d+)").unwrap());
    static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").unwrap());

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_normalize_text() {
        let raw = "Dear Sir:\r\n\r\n\r\nThe   sample,\tis red.\n\n\n\nSincerely,";
        assert_eq!(
            normalize_text(raw),
            "Dear Sir:\n\nThe sample, is red.\n\nSincerely,"
        );
    }

    #[test]
    fn test_crlf_becomes_blank_line() {
        assert_eq!(normalize_text("a\r\nb"), "a\n\nb");
    }

    #[test]
    fn test_pretty_text() {
        let raw = "  TARIFF NO.: 1902.19.2090 \n\n\n   Ms. Jane Doe\n\t\nAcme Law LLP  ";
        assert_eq!(
            pretty_text(raw),
            "TARIFF NO.: 1902.19.2090\nMs. Jane Doe\nAcme Law LLP"
        );
    }

    #[test]
    fn test_document_from_raw() {
        let doc = document_from_raw("N1", "Line one\n\n\n\nLine   two");
        assert_eq!(doc.id, "N1");
        assert_eq!(doc.normalized, "Line one\n\nLine two");
        assert_eq!(doc.pretty, "Line one\nLine   two");
    }

    #[test]
    fn test_first_match_respects_order() {
        let matchers = [Matcher::Capture(&RE_CODE), Matcher::Capture(&RE_NUMBER)];
        assert_eq!(first_match(&matchers, "7 then CODE 42"), Some("42".to_string()));

        let reversed = [Matcher::Capture(&RE_NUMBER), Matcher::Capture(&RE_CODE)];
        assert_eq!(first_match(&reversed, "7 then CODE 42"), Some("7".to_string()));
    }

    #[test]
    fn test_first_match_collapses_and_misses() {
        fn spaced(_: &str) -> Option<String> {
            Some("  two   words ".to_string())
        }
        let matchers = [Matcher::Capture(&RE_CODE), Matcher::Func(spaced)];
        assert_eq!(first_match(&matchers, "nothing"), Some("two words".to_string()));
        assert_eq!(first_match(&[Matcher::Capture(&RE_CODE)], "nothing"), None);
    }

    #[test]
    fn test_head_lines() {
        assert_eq!(head_lines("a\nb\nc", 2), "a\nb");
        assert_eq!(head_lines("a", 5), "a");
    }
}
