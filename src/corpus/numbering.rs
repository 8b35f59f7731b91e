//! Numbering grammars
//!
//! Section titles carry two kinds of identifiers: plain numeric section
//! numbers ("0", "2.1") and entry ids ("P35", "C1", "F1.1"). The title
//! patterns are tried in priority order; the entry-id grammar is one
//! uppercase classifying letter, one or more digits, and an optional
//! dotted remainder.

use once_cell::sync::Lazy;
use regex::Regex;

/// Title prefix patterns, in priority order: "0. ", "2.1 ", "P35. ", "F1.1 ".
static SECTION_NUMBER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^(\d+)\.\s").unwrap(),
        Regex::new(r"^(\d+\.\d+)\s").unwrap(),
        Regex::new(r"^([A-Z]\d+)\.\s").unwrap(),
        Regex::new(r"^([A-Z]\d+\.\d+)\s").unwrap(),
    ]
});

/// Entry-id grammar applied to an already-extracted section number.
static ENTRY_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z])(\d+(?:\.\d+)?)$").unwrap());

/// Strips an entry-id prefix (plus separating punctuation) off a title.
static ENTRY_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]\d+(?:\.\d+)?\.?\s*(.+)$").unwrap());

/// Extract the section number from a title, if it has one.
pub fn extract_section_number(title: &str) -> Option<String> {
    for pattern in SECTION_NUMBER_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(title) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Test a section number against the entry-id grammar.
/// Returns the classifying letter and the numeric remainder.
pub fn parse_entry_id(number: &str) -> Option<(char, String)> {
    let caps = ENTRY_ID_REGEX.captures(number)?;
    let tag = caps[1].chars().next()?;
    Some((tag, caps[2].to_string()))
}

/// Derive an entry name by stripping the id prefix from the section title.
/// Falls back to the full title when the prefix is absent.
pub fn strip_entry_prefix(title: &str) -> String {
    match ENTRY_NAME_REGEX.captures(title) {
        Some(caps) => caps[1].to_string(),
        None => title.to_string(),
    }
}
