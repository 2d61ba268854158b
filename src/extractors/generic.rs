// src/extractors/generic.rs
use crate::extractors::locator::find_keyword_context;
use crate::extractors::matches::{dedupe_matches, Match};
use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\W+").expect("Failed to compile NON_WORD_RE"));

// Tokens of this many characters or fewer are too short to search for.
const MIN_TERM_CHARS: usize = 2;

/// Splits a pointer on non-word runs and keeps the tokens worth searching for.
pub fn significant_terms(pointer: &str) -> Vec<&str> {
    NON_WORD_RE
        .split(pointer)
        .filter(|term| term.chars().count() > MIN_TERM_CHARS)
        .collect()
}

/// Fallback search: union of keyword hits for every significant term, deduplicated by span.
pub fn generic_search(pointer: &str, pages: &[String], radius: usize) -> Vec<Match> {
    let terms = significant_terms(pointer);
    tracing::debug!("Generic search for '{}' using terms {:?}", pointer, terms);

    let results = terms
        .iter()
        .flat_map(|term| find_keyword_context(term, pages, radius))
        .collect();

    dedupe_matches(results)
}
