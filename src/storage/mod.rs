// src/storage/mod.rs
use crate::documents::models::AnalysisReport;
use crate::documents::AnalyzedDocument;
use crate::utils::error::StorageError;
use crate::utils::html_debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub struct StorageManager {
    base_dir: PathBuf,
    // Artifact names handed out during this run
    claimed: HashSet<String>,
}

/// Where one document's artifacts go, and the name they share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLocation {
    pub dir: PathBuf,
    pub name: String,
}

impl ReportLocation {
    /// Path of an artifact in this location, e.g. `<dir>/<name>_pointers.json`.
    pub fn artifact_path(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}", self.name, suffix))
    }
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path, claimed: HashSet::new() })
    }

    /// Reserves a directory for one document: /base_dir/<stem>_<ext>/
    ///
    /// A name already used in this run (same file name from another directory)
    /// gets a numeric suffix so no report overwrites another.
    pub fn claim_location(&mut self, report: &AnalysisReport) -> Result<ReportLocation, StorageError> {
        let base_name = report.artifact_name();
        let mut name = base_name.clone();
        let mut counter = 2;
        while self.claimed.contains(&name) {
            name = format!("{}_{}", base_name, counter);
            counter += 1;
        }
        if name != base_name {
            tracing::warn!(
                "Output name '{}' already used in this run; saving {} under '{}'",
                base_name, report.file, name
            );
        }

        let dir = self.base_dir.join(&name);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(StorageError::IoError)?;
        }

        self.claimed.insert(name.clone());
        Ok(ReportLocation { dir, name })
    }

    /// Saves the pointer report as pretty JSON
    pub fn save_report(&self, location: &ReportLocation, report: &AnalysisReport) -> Result<PathBuf, StorageError> {
        let file_path = location.artifact_path("_pointers.json");

        let json = serde_json::to_string_pretty(report)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved report to {}", file_path.display());

        Ok(file_path)
    }

    /// Saves summary metadata about the report in JSON format
    pub fn save_report_metadata(&self, location: &ReportLocation, report: &AnalysisReport) -> Result<PathBuf, StorageError> {
        let file_path = location.artifact_path("_pointers_meta.json");

        let (match_count, placeholder_count) = report.match_counts();
        let metadata = serde_json::json!({
            "file": report.file,
            "page_count": report.pages,
            "pointer_count": report.results.len(),
            "match_count": match_count,
            "placeholder_count": placeholder_count,
            "analysis_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }

    /// Writes every artifact for one document and returns the paths written.
    /// Failures are logged and skipped so the rest of the run carries on.
    pub fn persist(&mut self, analyzed: &AnalyzedDocument, debug: bool) -> Vec<PathBuf> {
        let report = &analyzed.report;
        let location = match self.claim_location(report) {
            Ok(location) => location,
            Err(e) => {
                tracing::error!("Failed to prepare output directory for {}: {}", report.file, e);
                return Vec::new();
            }
        };

        let mut written = Vec::new();

        match self.save_report(&location, report) {
            Ok(path) => written.push(path),
            Err(e) => tracing::error!("Failed to save report for {}: {}", report.file, e),
        }

        match self.save_report_metadata(&location, report) {
            Ok(path) => written.push(path),
            Err(e) => tracing::error!("Failed to save report metadata for {}: {}", report.file, e),
        }

        if debug {
            let debug_path = location.artifact_path("_annotated.html");
            match html_debug::save_debug_html(&analyzed.pages, report, &debug_path) {
                Ok(()) => written.push(debug_path),
                Err(e) => tracing::warn!("Failed to create debug HTML for {}: {}", report.file, e),
            }
        }

        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::Match;
    use indexmap::IndexMap;

    fn report_for(file: &str, rationale: &str) -> AnalysisReport {
        let mut results = IndexMap::new();
        results.insert(
            "amount".to_string(),
            vec![Match::located(1, 19, 29, "Rs. 10,000".into(), rationale.into())],
        );
        results.insert("date".to_string(), vec![Match::placeholder("No date-like pattern found; try a different pointer or supply examples.")]);
        AnalysisReport { file: file.into(), pages: 3, results }
    }

    fn read_report(path: &Path) -> AnalysisReport {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_save_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = StorageManager::new(dir.path().join("out")).unwrap();
        let report = report_for("invoice.pdf", "Matched regex: x");

        let location = storage.claim_location(&report).unwrap();
        let path = storage.save_report(&location, &report).unwrap();
        assert!(path.ends_with("invoice_pdf/invoice_pdf_pointers.json"));
        assert_eq!(read_report(&path), report);
    }

    #[test]
    fn test_same_stem_different_extension_keeps_both_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = StorageManager::new(dir.path()).unwrap();
        let pdf = report_for("contract.pdf", "A");
        let txt = report_for("contract.txt", "B");

        let pdf_location = storage.claim_location(&pdf).unwrap();
        let pdf_path = storage.save_report(&pdf_location, &pdf).unwrap();
        let txt_location = storage.claim_location(&txt).unwrap();
        let txt_path = storage.save_report(&txt_location, &txt).unwrap();

        assert_ne!(pdf_path, txt_path);
        assert_eq!(read_report(&pdf_path), pdf);
        assert_eq!(read_report(&txt_path), txt);
    }

    #[test]
    fn test_same_file_name_from_two_directories_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = StorageManager::new(dir.path()).unwrap();
        let first = report_for("deed.pdf", "first");
        let second = report_for("deed.pdf", "second");

        let first_location = storage.claim_location(&first).unwrap();
        let second_location = storage.claim_location(&second).unwrap();
        assert_eq!(first_location.name, "deed_pdf");
        assert_eq!(second_location.name, "deed_pdf_2");

        let first_path = storage.save_report(&first_location, &first).unwrap();
        let second_meta = storage.save_report_metadata(&second_location, &second).unwrap();
        let second_path = storage.save_report(&second_location, &second).unwrap();

        assert_eq!(read_report(&first_path), first);
        assert_eq!(read_report(&second_path), second);
        assert!(second_meta.ends_with("deed_pdf_2/deed_pdf_2_pointers_meta.json"));
    }

    #[test]
    fn test_persist_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = StorageManager::new(dir.path()).unwrap();
        let analyzed = AnalyzedDocument {
            pages: vec!["Paid on 05/06/2023 Rs. 10,000".to_string()],
            report: report_for("receipt.txt", "Matched regex: x"),
        };

        let written = storage.persist(&analyzed, true);
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|path| path.exists()));
        assert!(written[2].ends_with("receipt_txt/receipt_txt_annotated.html"));

        assert_eq!(storage.persist(&analyzed, false).len(), 2);
    }

    #[test]
    fn test_persist_failure_does_not_stop_later_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = StorageManager::new(dir.path()).unwrap();
        // A plain file where the output directory should go makes every write fail.
        fs::write(dir.path().join("blocked_txt"), "not a directory").unwrap();

        let blocked = AnalyzedDocument { pages: Vec::new(), report: report_for("blocked.txt", "A") };
        assert!(storage.persist(&blocked, true).is_empty());

        let fine = AnalyzedDocument { pages: Vec::new(), report: report_for("fine.txt", "B") };
        let written = storage.persist(&fine, true);
        assert_eq!(written.len(), 3);
        assert_eq!(read_report(&written[0]), fine.report);
    }

    #[test]
    fn test_save_report_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = StorageManager::new(dir.path()).unwrap();
        let report = report_for("invoice.pdf", "Matched regex: x");

        let location = storage.claim_location(&report).unwrap();
        let path = storage.save_report_metadata(&location, &report).unwrap();
        let meta: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(meta["file"], "invoice.pdf");
        assert_eq!(meta["page_count"], 3);
        assert_eq!(meta["pointer_count"], 2);
        assert_eq!(meta["match_count"], 1);
        assert_eq!(meta["placeholder_count"], 1);
        assert!(meta["analysis_timestamp"].as_str().is_some());
    }
}
