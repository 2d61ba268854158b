// src/extractors/detectors.rs
//! Canned detectors for the pointer categories that have a known textual shape.

// --- Imports ---
use crate::extractors::locator::{find_all_regex, find_keyword_context, locate};
use crate::extractors::matches::{dedupe_matches, Match};
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---
// Numeric D/M/Y or D-M-Y, ISO Y-M-D, or "Mon D, YYYY" with optional period and comma.
pub static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}-\d{1,2}-\d{1,2}|(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)[a-z]*\.?,?\s+\d{1,2},?\s+\d{2,4})\b",
    )
    .expect("Failed to compile DATE_RE")
});

// Currency prefix, optional space, digits with optional thousands separators and decimals.
// Symbols get no leading word boundary so "$100" matches at the start of a line.
pub static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\b(?:Rs\.?|INR|USD|EUR)|\$|€)\s?\d[\d,]*(?:\.\d+)?\b")
        .expect("Failed to compile AMOUNT_RE")
});

// One to three capitalized words on one line, optional comma, then a title (title is case-insensitive).
// The title may sit on the following line, as in stacked signature blocks.
pub static SIGNATORY_TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[A-Z][a-z]+(?:[ \t][A-Z][a-z]+){0,2}\s*,?\s*(?i:Director|Manager|CEO|CFO|Partner|Proprietor)",
    )
    .expect("Failed to compile SIGNATORY_TITLE_RE")
});

pub const SIGNATURE_KEYWORDS: &[&str] = &[
    "signed",
    "signature",
    "for and on behalf",
    "authorised signatory",
    "signatory",
];

pub const SIGNATORY_TITLE_RATIONALE: &str = "Possible signatory line (name + title)";

pub fn detect_dates(pages: &[String], radius: usize) -> Vec<Match> {
    find_all_regex(&DATE_RE, pages, radius)
}

pub fn detect_amounts(pages: &[String], radius: usize) -> Vec<Match> {
    find_all_regex(&AMOUNT_RE, pages, radius)
}

/// Keyword passes in list order, then the name+title pass, deduplicated by span.
pub fn detect_signatories(pages: &[String], radius: usize) -> Vec<Match> {
    let mut results: Vec<Match> = SIGNATURE_KEYWORDS
        .iter()
        .flat_map(|keyword| find_keyword_context(keyword, pages, radius))
        .collect();

    results.extend(locate(&SIGNATORY_TITLE_RE, pages, radius, SIGNATORY_TITLE_RATIONALE));

    dedupe_matches(results)
}
