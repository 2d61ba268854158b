// src/documents/mod.rs
pub mod loader;
pub mod models;

use crate::extractors::PointerResolver;
use crate::utils::error::{AppError, DocumentError};
use models::AnalysisReport;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A finished request: the page texts it ran against plus the report built from them.
#[derive(Debug, Clone)]
pub struct AnalyzedDocument {
    pub pages: Vec<String>,
    pub report: AnalysisReport,
}

/// Resolves every pointer against the page texts of `path`.
pub fn analyze_document(
    path: &Path,
    pointers: &[String],
    resolver: &PointerResolver,
) -> Result<AnalyzedDocument, DocumentError> {
    let pages = loader::load_pages(path)?;
    let results = resolver.resolve_all(pointers, &pages);

    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let report = AnalysisReport { file, pages: pages.len(), results };
    let (hits, placeholders) = report.match_counts();
    tracing::info!(
        "Analyzed {}: {} pointers, {} matches, {} placeholders",
        report.file,
        report.results.len(),
        hits,
        placeholders
    );

    Ok(AnalyzedDocument { pages, report })
}

/// Analyzes each document as an independent request on the blocking pool.
/// Outcomes come back in the order of `paths`.
pub async fn analyze_documents(
    paths: &[PathBuf],
    pointers: &[String],
    resolver: &PointerResolver,
) -> Vec<(PathBuf, Result<AnalyzedDocument, AppError>)> {
    let pointers = Arc::new(pointers.to_vec());

    let handles: Vec<_> = paths
        .iter()
        .map(|path| {
            let path = path.clone();
            let pointers = Arc::clone(&pointers);
            let resolver = resolver.clone();
            tokio::task::spawn_blocking(move || analyze_document(&path, &pointers, &resolver))
        })
        .collect();

    let mut outcomes = Vec::with_capacity(paths.len());
    for (path, handle) in paths.iter().zip(handles) {
        let outcome = match handle.await {
            Ok(result) => result.map_err(AppError::from),
            Err(e) => Err(AppError::Processing(format!(
                "Analysis task for {} failed: {}",
                path.display(),
                e
            ))),
        };
        outcomes.push((path.clone(), outcome));
    }
    outcomes
}
