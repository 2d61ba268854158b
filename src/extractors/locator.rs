// src/extractors/locator.rs
//! Span location over a page-text sequence.
//!
//! Regex offsets are byte positions; everything reported from here is in characters
//! so callers can index page text the way a reader counts it.

use crate::extractors::matches::Match;
use regex::{Regex, RegexBuilder};

/// Returns the text within `radius` characters of the byte span `start..end`,
/// trimmed and with newlines flattened to spaces.
pub fn snippet_around(text: &str, start: usize, end: usize, radius: usize) -> String {
    let from = if radius == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    text[from..to].trim().replace('\n', " ")
}

/// One match per non-overlapping occurrence of `regex`, page by page, left to right.
pub fn find_all_regex(regex: &Regex, pages: &[String], radius: usize) -> Vec<Match> {
    let rationale = format!("Matched regex: {}", regex.as_str());
    locate(regex, pages, radius, &rationale)
}

/// Case-insensitive literal search for `keyword` across all pages.
pub fn find_keyword_context(keyword: &str, pages: &[String], radius: usize) -> Vec<Match> {
    if keyword.is_empty() {
        return Vec::new();
    }

    let regex = match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("Skipping keyword '{}': could not compile search pattern: {}", keyword, e);
            return Vec::new();
        }
    };

    let rationale = format!("Keyword match: '{}'", keyword);
    locate(&regex, pages, radius, &rationale)
}

/// Runs `regex` over every page and labels each hit with `rationale`.
pub fn locate(regex: &Regex, pages: &[String], radius: usize, rationale: &str) -> Vec<Match> {
    let mut matches = Vec::new();

    for (index, page_text) in pages.iter().enumerate() {
        // Character offset of `last_byte`, advanced incrementally since hits arrive in order.
        let mut last_byte = 0;
        let mut last_char = 0;

        for hit in regex.find_iter(page_text) {
            let start_char = last_char + page_text[last_byte..hit.start()].chars().count();
            let end_char = start_char + hit.as_str().chars().count();
            last_byte = hit.end();
            last_char = end_char;

            matches.push(Match::located(
                index + 1,
                start_char,
                end_char,
                snippet_around(page_text, hit.start(), hit.end(), radius),
                rationale.to_string(),
            ));
        }
    }

    tracing::trace!("Pattern '{}' located {} matches across {} pages", regex.as_str(), matches.len(), pages.len());
    matches
}
