//! Replying person, reconstructed from the signature block after "Sincerely"

use regex::Regex;
use std::sync::LazyLock;
use tariff_domain::LINE_BREAK;

const STOP_MARKERS: [&str; 4] = [
    "If you have any questions",
    "National Import Specialist",
    "cc:",
    "Enclosure",
];

static RE_SINCERELY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bSincerely\b[:,]?\s*(.+)$").expect("valid closing regex")
});
static RE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Za-z.'\-]+(?:\s+[A-Z][A-Za-z.'\-]+){0,4}$").expect("valid name regex")
});
static RE_OFFICE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Division|Branch|Office|Center|Directorate|Team|Unit|Commodity|Specialist)\b")
        .expect("valid office keyword regex")
});
static RE_TITLE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:Director|Chief|Specialist|Supervisor|Manager|Officer|Attorney|Analyst|Coordinator|Executive|Acting|Deputy|Assistant)\b",
    )
    .expect("valid title keyword regex")
});
// "<name> Acting Director": name, optional rank, title at the end of the line
static RE_TRAILING_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.*?\S)\s+((?:Acting|Deputy|Assistant|Associate|Executive)\s+)?(Director|Chief|Manager|Officer|Specialist|Supervisor|Attorney|Analyst|Coordinator)\s*$",
    )
    .expect("valid trailing title regex")
});

const OFFICE_KEYWORDS: [&str; 7] = [
    "Division",
    "Branch",
    "Office",
    "Center",
    "Directorate",
    "Laboratory",
    "Port",
];

// Words that end an office name when walking backwards from its keyword.
// "Specialist" is absent: it is part of "National Commodity Specialist Division".
const TITLE_STOP_WORDS: [&str; 13] = [
    "Director",
    "Chief",
    "Manager",
    "Officer",
    "Supervisor",
    "Attorney",
    "Analyst",
    "Coordinator",
    "Acting",
    "Deputy",
    "Assistant",
    "Associate",
    "Executive",
];

/// At most this many capitalized words precede the office keyword
const MAX_OFFICE_PREFIX: usize = 6;

fn looks_like_name(s: &str) -> bool {
    RE_NAME.is_match(s)
}

fn looks_like_office(s: &str) -> bool {
    RE_OFFICE_WORD.is_match(s)
}

fn looks_like_title(s: &str) -> bool {
    RE_TITLE_WORD.is_match(s)
}

/// Split a trailing job title off a line: `("Jane Doe", "Acting Director")`
fn split_title(line: &str) -> Option<(String, String)> {
    let caps = RE_TRAILING_TITLE.captures(line)?;
    let name = caps[1].trim().to_string();
    let rank = caps.get(2).map_or("", |m| m.as_str());
    let title = format!("{rank}{}", &caps[3]).trim().to_string();
    Some((name, title))
}

/// Extract the replying person as up to three `<br>`-joined lines
///
/// Signatures come in two shapes. A structured block keeps one item per line
/// (name, title, office), sometimes with the name broken over two lines. A
/// collapsed block has everything on one line and is rebuilt by peeling the
/// office, then the title, off the end.
pub fn extract_replying_person(text: &str) -> Option<String> {
    let caps = RE_SINCERELY.captures(text)?;
    let mut tail = caps.get(1).map_or("", |m| m.as_str());
    for marker in STOP_MARKERS {
        if let Some((before, _)) = tail.split_once(marker) {
            tail = before;
        }
    }

    let mut lines: Vec<String> = tail
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let collapsed = lines
        .first()
        .is_some_and(|first| looks_like_title(first) && looks_like_office(first));

    let signature = if lines.len() >= 2 && !collapsed {
        merge_broken_name(&mut lines);
        structured_signature(&lines)
    } else {
        collapsed_signature(lines.first().map_or("", String::as_str))
    };

    (!signature.is_empty()).then(|| signature.join(LINE_BREAK))
}

// ["Steven A.", "Mack", "Director", ...] -> ["Steven A. Mack", "Director", ...]
fn merge_broken_name(lines: &mut Vec<String>) {
    if lines.len() >= 3
        && (looks_like_title(&lines[2]) || looks_like_office(&lines[2]))
        && looks_like_name(&lines[0])
        && looks_like_name(&lines[1])
    {
        let second = lines.remove(1);
        lines[0] = format!("{} {}", lines[0], second);
    }
}

fn structured_signature(lines: &[String]) -> Vec<String> {
    let mut signature = Vec::with_capacity(3);
    match split_title(&lines[0]) {
        Some((name, title)) => {
            signature.push(name);
            signature.push(title);
        }
        None => signature.push(lines[0].clone()),
    }

    for line in &lines[1..] {
        if signature.len() >= 3 {
            break;
        }
        if line.to_lowercase().starts_with("sincerely") {
            continue;
        }
        signature.push(line.clone());
    }
    signature.truncate(3);
    signature
}

fn is_office_word(word: &str) -> bool {
    word.len() >= 2
        && word.starts_with(|c: char| c.is_ascii_uppercase())
        && word.chars().all(|c| c.is_ascii_alphabetic() || "&.-".contains(c))
        && !TITLE_STOP_WORDS.contains(&word)
}

/// Split a trailing office name off a line: `("Jane Roe Director", "Regulations Division")`
///
/// The first word always stays with the name.
fn split_office(line: &str) -> Option<(String, String)> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let last = words.len().checked_sub(1)?;
    if last == 0 || !OFFICE_KEYWORDS.contains(&words[last]) {
        return None;
    }

    let mut start = last;
    while start > 1 && last - start < MAX_OFFICE_PREFIX && is_office_word(words[start - 1]) {
        start -= 1;
    }
    Some((words[..start].join(" "), words[start..].join(" ")))
}

fn collapsed_signature(line: &str) -> Vec<String> {
    let mut rest = line.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut office = None;
    if let Some((name, found)) = split_office(&rest) {
        office = Some(found);
        rest = name;
    }

    let mut title = None;
    if let Some((name, found)) = split_title(&rest) {
        title = Some(found);
        rest = name;
    }

    [Some(rest), title, office]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect()
}
