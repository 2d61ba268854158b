// src/documents/models.rs
use crate::extractors::Match;
use crate::utils::error::DocumentError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source formats a page-text sequence can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Html,
    PlainText,
    JsonPages,
}

impl DocumentFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "html" | "htm" => Ok(DocumentFormat::Html),
            "txt" => Ok(DocumentFormat::PlainText),
            "json" => Ok(DocumentFormat::JsonPages),
            _ => Err(DocumentError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Answer for one document: every pointer mapped to its matches, in pointer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub file: String,
    pub pages: usize,
    pub results: IndexMap<String, Vec<Match>>,
}

impl AnalysisReport {
    /// Base name for persisted artifacts: the file stem plus its extension, e.g. `contract_pdf`.
    pub fn artifact_name(&self) -> String {
        let path = Path::new(&self.file);
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("document");
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => format!("{}_{}", stem, ext.to_ascii_lowercase()),
            None => stem.to_string(),
        }
    }

    /// (real hits, placeholders) across all pointers.
    pub fn match_counts(&self) -> (usize, usize) {
        self.results
            .values()
            .flatten()
            .fold((0, 0), |(hits, placeholders), m| {
                if m.is_placeholder() {
                    (hits, placeholders + 1)
                } else {
                    (hits + 1, placeholders)
                }
            })
    }
}
