// src/extractors/resolver.rs
//! Maps a free-text pointer onto one detector and guarantees a non-empty answer.

use crate::extractors::detectors::{detect_amounts, detect_dates, detect_signatories};
use crate::extractors::generic::generic_search;
use crate::extractors::matches::Match;
use crate::utils::config::ResolverConfig;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerCategory {
    Date,
    Amount,
    Signatory,
    Generic,
}

// Priority order; the first category with a trigger contained in the pointer wins.
const CATEGORY_TRIGGERS: &[(PointerCategory, &[&str])] = &[
    (PointerCategory::Date, &["date", "dates"]),
    (
        PointerCategory::Amount,
        &["amount", "total", "value", "price", "contract value", "contract amount"],
    ),
    (
        PointerCategory::Signatory,
        &["who signed", "signed", "signature", "signatory"],
    ),
];

impl PointerCategory {
    /// Classifies a pointer by case-insensitive substring containment against each trigger list.
    pub fn classify(pointer: &str) -> Self {
        let lowered = pointer.to_lowercase();
        CATEGORY_TRIGGERS
            .iter()
            .find(|(_, triggers)| triggers.iter().any(|t| lowered.contains(t)))
            .map(|(category, _)| *category)
            .unwrap_or(PointerCategory::Generic)
    }

    /// Rationale of the placeholder returned when this category finds nothing.
    pub fn placeholder_rationale(self) -> &'static str {
        match self {
            PointerCategory::Date => {
                "No date-like pattern found; try a different pointer or supply examples."
            }
            PointerCategory::Amount => "No currency/amount pattern found.",
            PointerCategory::Signatory => "No likely signature lines found.",
            PointerCategory::Generic => "No matches found for the pointer.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PointerCategory::Date => "date",
            PointerCategory::Amount => "amount",
            PointerCategory::Signatory => "signatory",
            PointerCategory::Generic => "generic",
        }
    }
}

/// Entry point for answering pointers against one document's page texts.
///
/// Holds no per-request state, so one resolver can serve any number of documents.
#[derive(Debug, Clone, Default)]
pub struct PointerResolver {
    config: ResolverConfig,
}

impl PointerResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a single pointer. The result is never empty.
    pub fn resolve(&self, pointer: &str, pages: &[String]) -> Vec<Match> {
        let category = PointerCategory::classify(pointer);
        let radius = self.config.snippet_radius;

        let matches = match category {
            PointerCategory::Date => detect_dates(pages, radius),
            PointerCategory::Amount => detect_amounts(pages, radius),
            PointerCategory::Signatory => detect_signatories(pages, radius),
            PointerCategory::Generic => generic_search(pointer, pages, radius),
        };

        tracing::debug!(
            "Pointer '{}' classified as {} with {} matches",
            pointer,
            category.as_str(),
            matches.len()
        );

        if matches.is_empty() {
            vec![Match::placeholder(category.placeholder_rationale())]
        } else {
            matches
        }
    }

    /// Resolves every pointer in caller order.
    ///
    /// A repeated pointer keeps the position of its first occurrence.
    pub fn resolve_all(&self, pointers: &[String], pages: &[String]) -> IndexMap<String, Vec<Match>> {
        let mut results = IndexMap::with_capacity(pointers.len());
        for pointer in pointers {
            let matches = self.resolve(pointer, pages);
            results.insert(pointer.clone(), matches);
        }
        results
    }
}
