// src/extractors/matches.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Composite dedup key: (page, start_char, end_char).
pub type MatchKey = (Option<usize>, Option<usize>, Option<usize>);

/// A located occurrence of interest, or a placeholder saying nothing was found.
///
/// Either all of `page`, `start_char`, `end_char` are set (a real hit) or none are.
/// Build values through [`Match::located`] and [`Match::placeholder`] to keep it that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub snippet: String,
    pub page: Option<usize>,      // 1-based
    pub start_char: Option<usize>, // 0-based, inclusive
    pub end_char: Option<usize>,   // 0-based, exclusive
    pub rationale: String,
}

impl Match {
    pub fn located(
        page: usize,
        start_char: usize,
        end_char: usize,
        snippet: String,
        rationale: String,
    ) -> Self {
        Self {
            snippet,
            page: Some(page),
            start_char: Some(start_char),
            end_char: Some(end_char),
            rationale,
        }
    }

    pub fn placeholder(rationale: &str) -> Self {
        Self {
            snippet: String::new(),
            page: None,
            start_char: None,
            end_char: None,
            rationale: rationale.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.page.is_none()
    }

    pub fn key(&self) -> MatchKey {
        (self.page, self.start_char, self.end_char)
    }
}

/// Drops later matches whose (page, start, end) repeats an earlier one, keeping first-seen order.
pub fn dedupe_matches(matches: Vec<Match>) -> Vec<Match> {
    let mut seen: HashSet<MatchKey> = HashSet::with_capacity(matches.len());
    matches.into_iter().filter(|m| seen.insert(m.key())).collect()
}
