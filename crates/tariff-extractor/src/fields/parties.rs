//! Parties and people: submitter, firm, importer, replying person, case handler
//!
//! Runs on the pretty (line-structured) view. The recipient block of a ruling
//! letter sits under the "TARIFF NO" line and looks like:
//!
//! ```text
//! TARIFF NO.: 1902.19.2090
//! Ms. Jane Doe
//! Acme Customs Brokers LLC
//! 100 Harbor Street, Suite 4
//! Newark, NJ 07102
//! RE: The tariff classification of ...
//! ```

use super::signature::extract_replying_person;
use crate::config::ExtractorConfig;
use crate::text::{collapse_whitespace, first_match, Matcher};
use regex::Regex;
use std::sync::LazyLock;

static RE_ADDRESS_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:Street|Avenue|Road|Boulevard|Suite|Floor|FL)\b|\b(?:St|Ave|Rd|Blvd|Ste)\.",
    )
    .expect("valid address keyword regex")
});
static RE_STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z]{2}\s+\d{5}(?:-\d{4})?\b").expect("valid state/zip regex")
});
static RE_PO_BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bP\.?\s*O\.?\s*Box\b").expect("valid PO box regex"));
static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,6}\b").expect("valid number regex"));
static RE_FIRM_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:LLP|LLC|Incorporated|Company|Corporation|Brokers|Customs|Law|Partners)\b|\b(?:L\.L\.C|Inc|Co|Corp)\.",
    )
    .expect("valid firm keyword regex")
});

static RE_TARIFF_NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bTARIFF\s+NO\.?\b").expect("valid tariff line regex"));
static RE_BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:RE\s*:|Dear\b)").expect("valid block end regex"));
static RE_HONORIFIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Mr\.|Ms\.|Mrs\.)\s+([A-Z][A-Za-z.\-']+(?:\s+[A-Z][A-Za-z.\-']+){0,3})\b")
        .expect("valid honorific regex")
});

static RE_ON_BEHALF_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bon behalf of\s+(?:your\s+client,?\s*)?(.+?)(?:\.\s|\.?$)")
        .expect("valid importer regex")
});
static RE_SPACE_BEFORE_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+,").expect("valid comma spacing regex"));

static RE_NATIONAL_SPECIALIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bNational Import Specialist\s+").expect("valid specialist regex")
});
static RE_SPECIALIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bImport Specialist\s+").expect("valid specialist regex"));
static RE_NAME_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z.'\-]+").expect("valid name token regex"));
static RE_TOKEN_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+").expect("valid token gap regex"));
static RE_NAME_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s+(?:at\b|,|\.|\)|$)").expect("valid name end regex")
});

static IMPORTER: &[Matcher] = &[Matcher::Capture(&RE_ON_BEHALF_OF)];

static CASE_HANDLER: &[Matcher] = &[
    Matcher::Func(national_import_specialist),
    Matcher::Func(import_specialist),
];

/// A case handler's name has at most this many tokens
const MAX_NAME_TOKENS: usize = 4;

/// People and organizations named in a ruling letter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parties {
    /// Organization that submitted the request
    pub submitting_firm: Option<String>,
    /// Person who submitted the request
    pub submitter: Option<String>,
    /// Client on whose behalf the request was made
    pub importer: Option<String>,
    /// `<br>`-joined signature of the replying official
    pub replying_person: Option<String>,
    /// Import specialist named as the contact
    pub case_handler: Option<String>,
}

/// Returns true if a line looks like a postal address fragment
pub fn is_address_line(line: &str) -> bool {
    !line.is_empty()
        && (RE_ADDRESS_WORD.is_match(line)
            || RE_STATE_ZIP.is_match(line)
            || RE_PO_BOX.is_match(line)
            || (RE_NUMBER.is_match(line) && line.contains(',')))
}

/// Returns true if a line looks like an organization name
pub fn looks_like_firm(line: &str) -> bool {
    !line.is_empty()
        && !is_address_line(line)
        && (RE_FIRM_WORD.is_match(line) || line.contains('&'))
}

/// Extract every party/people field from the pretty view
pub fn extract_parties_people(text: &str, config: &ExtractorConfig) -> Parties {
    let head: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(config.party_line_limit)
        .collect();

    let (mut submitter, submitting_firm) = recipient_block(&head, config.tariff_block_window);
    if submitter.is_none() {
        submitter = honorific_submitter(&head);
    }

    Parties {
        submitting_firm,
        submitter,
        importer: extract_importer(text),
        replying_person: extract_replying_person(text),
        case_handler: first_match(CASE_HANDLER, text),
    }
}

/// `(submitter, submitting_firm)` from the lines under "TARIFF NO"
///
/// The first non-address line is the submitter; the next firm-looking line
/// after it is the firm. The block ends at "RE:" or "Dear".
fn recipient_block(head: &[&str], window: usize) -> (Option<String>, Option<String>) {
    let Some(tariff_idx) = head.iter().position(|line| RE_TARIFF_NO.is_match(line)) else {
        return (None, None);
    };

    let mut submitter = None;
    let mut firm = None;
    let block = head
        .iter()
        .skip(tariff_idx + 1)
        .take(window)
        .take_while(|line| !RE_BLOCK_END.is_match(line));

    for line in block {
        if submitter.is_none() {
            if !is_address_line(line) {
                submitter = Some(line.to_string());
            }
            continue;
        }
        if looks_like_firm(line) {
            firm = Some(line.to_string());
            break;
        }
    }
    (submitter, firm)
}

fn honorific_submitter(head: &[&str]) -> Option<String> {
    head.iter().find_map(|line| {
        RE_HONORIFIC
            .captures(line)
            .map(|caps| format!("{} {}", &caps[1], &caps[2]))
    })
}

fn extract_importer(text: &str) -> Option<String> {
    let importer = first_match(IMPORTER, text)?;
    let importer = collapse_whitespace(importer.trim_end_matches(','));
    let importer = RE_SPACE_BEFORE_COMMA.replace_all(&importer, ",").into_owned();
    (!importer.is_empty()).then_some(importer)
}

fn national_import_specialist(text: &str) -> Option<String> {
    specialist_name(&RE_NATIONAL_SPECIALIST, text)
}

fn import_specialist(text: &str) -> Option<String> {
    specialist_name(&RE_SPECIALIST, text)
}

/// Name following the first specialist mention whose name is properly ended
///
/// A name is 1 to 4 tokens and must be followed by whitespace and then "at",
/// a comma, a period, a closing parenthesis or the end of the text. Longer
/// names are preferred. The ending check stands in for a lookahead, which
/// the regex engine does not support.
fn specialist_name(intro: &Regex, text: &str) -> Option<String> {
    intro.find_iter(text).find_map(|m| {
        let start = m.end();
        name_token_ends(&text[start..])
            .into_iter()
            .rev()
            .find(|&end| RE_NAME_END.is_match(&text[start + end..]))
            .map(|end| text[start..start + end].to_string())
    })
}

/// Byte offsets where the 1st, 2nd, ... name token ends
fn name_token_ends(s: &str) -> Vec<usize> {
    let mut ends = Vec::with_capacity(MAX_NAME_TOKENS);
    let mut pos = 0;
    while ends.len() < MAX_NAME_TOKENS {
        if !ends.is_empty() {
            match RE_TOKEN_GAP.find(&s[pos..]) {
                Some(gap) => pos += gap.end(),
                None => break,
            }
        }
        match RE_NAME_TOKEN.find(&s[pos..]) {
            Some(token) => {
                pos += token.end();
                ends.push(pos);
            }
            None => break,
        }
    }
    ends
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER: &str = "\
N317001
March 1, 2021
CLA-2-19:OT:RR:NC:N2:228
CATEGORY: Classification
TARIFF NO.: 1902.19.2090
Ms. Jane Doe
Acme Customs Brokers LLC
100 Harbor Street, Suite 4
Newark, NJ 07102
RE: The tariff classification of pasta from Italy
Dear Ms. Doe:
In your letter dated February 1, 2021, you requested a ruling on behalf of your client, Pasta Imports Inc.
This merchandise may be subject to other agencies. If you have any questions regarding the ruling,
contact National Import Specialist Kim Wachtel at kimberly.a.wachtel@cbp.dhs.gov.
Sincerely,
Steven A. Mack
Director
National Commodity Specialist Division";

    fn parties(text: &str) -> Parties {
        extract_parties_people(text, &ExtractorConfig::default())
    }

    #[test]
    fn test_full_header() {
        let p = parties(LETTER);
        assert_eq!(p.submitter.as_deref(), Some("Ms. Jane Doe"));
        assert_eq!(p.submitting_firm.as_deref(), Some("Acme Customs Brokers LLC"));
        assert_eq!(p.importer.as_deref(), Some("Pasta Imports Inc"));
        assert_eq!(p.case_handler.as_deref(), Some("Kim Wachtel"));
        assert_eq!(
            p.replying_person.as_deref(),
            Some("Steven A. Mack<br>Director<br>National Commodity Specialist Division")
        );
    }

    #[test]
    fn test_address_lines_are_skipped_for_submitter() {
        let text = "TARIFF NO.: 6301.40.0020\n1200 Main Street\nMr. John Smith\nSmith & Jones\nDear Mr. Smith:";
        let p = parties(text);
        assert_eq!(p.submitter.as_deref(), Some("Mr. John Smith"));
        assert_eq!(p.submitting_firm.as_deref(), Some("Smith & Jones"));
    }

    #[test]
    fn test_block_stops_at_re_line() {
        let text = "TARIFF NO.: 6301.40.0020\nMr. John Smith\nRE: Acme Law Group\nDear Sir:";
        let p = parties(text);
        assert_eq!(p.submitter.as_deref(), Some("Mr. John Smith"));
        assert_eq!(p.submitting_firm, None);
    }

    #[test]
    fn test_block_window_is_respected() {
        let mut text = String::from("TARIFF NO.: 6301.40.0020\nMr. John Smith\n");
        for i in 0..30 {
            text.push_str(&format!("note {i}\n"));
        }
        text.push_str("Smith Law LLP\n");
        let p = parties(&text);
        assert_eq!(p.submitter.as_deref(), Some("Mr. John Smith"));
        assert_eq!(p.submitting_firm, None);
    }

    #[test]
    fn test_honorific_fallback() {
        let text = "N1\nMrs. Ann Lee-Park\nSome Firm\nDear Mrs. Lee-Park:";
        let p = parties(text);
        assert_eq!(p.submitter.as_deref(), Some("Mrs. Ann Lee-Park"));
        assert_eq!(p.submitting_firm, None);
    }

    #[test]
    fn test_importer_without_client_phrase() {
        let text = "This request was made on behalf of\nGlobal Goods , LLC.";
        assert_eq!(parties(text).importer.as_deref(), Some("Global Goods, LLC"));
    }

    #[test]
    fn test_case_handler_without_national() {
        let text = "please contact Import Specialist John Q. Public at (212) 555-0100.";
        assert_eq!(parties(text).case_handler.as_deref(), Some("John Q. Public"));
    }

    #[test]
    fn test_case_handler_never_takes_email() {
        let text = "contact National Import Specialist Kim Wachtel at kim.wachtel@cbp.dhs.gov";
        assert_eq!(parties(text).case_handler.as_deref(), Some("Kim Wachtel"));
    }

    #[test]
    fn test_case_handler_needs_space_before_terminator() {
        let text = "please contact Import Specialist Kim Wachtel.";
        assert_eq!(parties(text).case_handler, None);

        let text = "please contact Import Specialist Kim Wachtel , or write to us";
        assert_eq!(parties(text).case_handler.as_deref(), Some("Kim Wachtel"));

        let text = "please contact Import Specialist Kim Wachtel\n";
        assert_eq!(parties(text).case_handler.as_deref(), Some("Kim Wachtel"));
    }

    #[test]
    fn test_case_handler_skips_unterminated_mention() {
        let text = "the Import Specialist Team reviewed it-\nlater, Import Specialist Ann Lee at ann@x.gov";
        assert_eq!(parties(text).case_handler.as_deref(), Some("Ann Lee"));
    }

    #[test]
    fn test_address_detector() {
        assert!(is_address_line("100 Harbor Street"));
        assert!(is_address_line("Newark, NJ 07102-1234"));
        assert!(is_address_line("P.O. Box 55"));
        assert!(is_address_line("Unit 5, Building B"));
        assert!(is_address_line("12 Main St. North"));
        assert!(!is_address_line("Ms. Jane Doe"));
        assert!(!is_address_line(""));
    }

    #[test]
    fn test_firm_detector() {
        assert!(looks_like_firm("Acme Trading Inc."));
        assert!(looks_like_firm("Baker & Sons"));
        assert!(looks_like_firm("Grunfeld Law Group"));
        assert!(!looks_like_firm("Acme Corp., Suite 100"));
        assert!(!looks_like_firm("Jane Doe"));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(parties(""), Parties::default());
    }
}
