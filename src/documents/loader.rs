// src/documents/loader.rs
//! Turns a document on disk into its page-text sequence.

// --- Imports ---
use crate::documents::models::DocumentFormat;
use crate::utils::error::DocumentError;
use once_cell::sync::Lazy;
use scraper::{node::Node, ElementRef, Html, Selector};
use std::fs;
use std::path::Path;

// pdftotext and friends separate pages with a form feed.
const PAGE_SEPARATOR: char = '\u{c}';

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to compile BODY_SELECTOR")
});

// Elements whose text never reaches the reader
const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

// Elements that end a line of text when rendered
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p", "pre", "section", "table", "td",
    "th", "tr", "ul",
];

/// Loads the page texts of `path`, choosing the reader from its extension.
pub fn load_pages(path: &Path) -> Result<Vec<String>, DocumentError> {
    let format = DocumentFormat::from_path(path)?;
    tracing::debug!("Loading {} as {:?}", path.display(), format);

    let pages = match format {
        DocumentFormat::Pdf => load_pdf_pages(path)?,
        DocumentFormat::Html => html_pages(&fs::read_to_string(path)?),
        DocumentFormat::PlainText => text_pages(&fs::read_to_string(path)?),
        DocumentFormat::JsonPages => json_pages(&fs::read_to_string(path)?)?,
    };

    tracing::info!("Loaded {} pages from {}", pages.len(), path.display());
    Ok(pages)
}

/// One string per PDF page in page-number order. Unreadable pages become empty strings.
fn load_pdf_pages(path: &Path) -> Result<Vec<String>, DocumentError> {
    let document = lopdf::Document::load(path).map_err(|e| DocumentError::Pdf(e.to_string()))?;

    let pages = document
        .get_pages()
        .keys()
        .map(|&number| match document.extract_text(&[number]) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Could not extract text from page {} of {}: {}", number, path.display(), e);
                String::new()
            }
        })
        .collect();

    Ok(pages)
}

/// Splits plain text on form feeds. The trailing feed pdftotext emits does not open a new page.
pub fn text_pages(raw: &str) -> Vec<String> {
    let body = raw.strip_suffix(PAGE_SEPARATOR).unwrap_or(raw);
    body.split(PAGE_SEPARATOR).map(str::to_string).collect()
}

/// Parses a JSON array of page strings.
pub fn json_pages(raw: &str) -> Result<Vec<String>, DocumentError> {
    serde_json::from_str(raw).map_err(|e| {
        DocumentError::Parse(format!("expected a JSON array of page strings: {}", e))
    })
}

/// Visible body text of an HTML document, split at CSS page breaks.
pub fn html_pages(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        tracing::debug!("HTML parser recovered from {} errors", document.errors.len());
    }

    let mut collector = PageCollector::default();
    match document.select(&BODY_SELECTOR).next() {
        Some(body) => collect_text(body, &mut collector),
        None => collect_text(document.root_element(), &mut collector),
    }
    collector.finish()
}

#[derive(Default)]
struct PageCollector {
    pages: Vec<String>,
    current: String,
}

impl PageCollector {
    fn end_line(&mut self) {
        if !self.current.is_empty() && !self.current.ends_with('\n') {
            self.current.push('\n');
        }
    }

    // Blank pages produced by back-to-back breaks are dropped.
    fn break_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        if !page.trim().is_empty() {
            self.pages.push(page);
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.break_page();
        self.pages
    }
}

fn collect_text(element: ElementRef<'_>, collector: &mut PageCollector) {
    let name = element.value().name();
    if SKIPPED_TAGS.contains(&name) {
        return;
    }

    let style = element.value().attr("style").unwrap_or_default();
    if forces_break(style, "page-break-before") || forces_break(style, "break-before") {
        collector.break_page();
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, collector);
        } else if let Node::Text(text) = child.value() {
            collector.current.push_str(&text.text);
        }
    }

    if BLOCK_TAGS.contains(&name) {
        collector.end_line();
    }

    if forces_break(style, "page-break-after") || forces_break(style, "break-after") {
        collector.break_page();
    }
}

/// True when the inline style sets `property` to anything other than `auto` or `avoid`.
fn forces_break(style: &str, property: &str) -> bool {
    style.split(';').any(|declaration| {
        let mut parts = declaration.splitn(2, ':');
        let key = parts.next().unwrap_or_default().trim();
        let value = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        key.eq_ignore_ascii_case(property) && !value.is_empty() && value != "auto" && !value.starts_with("avoid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_text_pages_split_on_form_feed() {
        assert_eq!(text_pages("one\u{c}two\u{c}"), vec!["one", "two"]);
        assert_eq!(text_pages("single page"), vec!["single page"]);
        assert_eq!(text_pages("a\u{c}\u{c}c"), vec!["a", "", "c"]);
        assert_eq!(text_pages(""), vec![""]);
    }

    #[test]
    fn test_json_pages() {
        assert_eq!(json_pages(r#"["p1", "p2"]"#).unwrap(), vec!["p1", "p2"]);
        assert!(matches!(json_pages(r#"{"pages": []}"#), Err(DocumentError::Parse(_))));
    }

    #[test]
    fn test_html_pages_skip_scripts_and_split_on_breaks() {
        let html = r#"
            <html><head><title>Deed</title><style>p { color: red }</style></head><body>
            <p>Agreement dated 05/06/2023</p>
            <script>var total = "$999";</script>
            <div style="page-break-before: always"><p>Rs. 10,000 payable</p></div>
            <div style="color: blue; page-break-after:always">John Doe, Director</div>
            <p style="page-break-before: auto">Annexure</p>
            </body></html>
        "#;
        let pages = html_pages(html);
        assert_eq!(pages.len(), 3, "pages: {:?}", pages);
        assert!(pages[0].contains("Agreement dated 05/06/2023"));
        assert!(!pages[0].contains("$999"));
        assert!(!pages[0].contains("Deed"));
        assert!(pages[1].contains("Rs. 10,000 payable"));
        assert!(pages[1].contains("John Doe, Director"));
        assert!(pages[2].contains("Annexure"));
    }

    #[test]
    fn test_html_block_elements_do_not_merge_words() {
        let pages = html_pages("<body><p>Signed</p><p>Witness</p></body>");
        assert_eq!(pages, vec!["Signed\nWitness\n"]);
    }

    #[test]
    fn test_forces_break() {
        assert!(forces_break("page-break-before: always", "page-break-before"));
        assert!(forces_break("PAGE-BREAK-AFTER:page", "page-break-after"));
        assert!(!forces_break("page-break-before: auto", "page-break-before"));
        assert!(!forces_break("break-after: avoid-page", "break-after"));
        assert!(!forces_break("color: red", "page-break-before"));
    }

    #[test]
    fn test_load_pages_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let txt_path = dir.path().join("contract.txt");
        fs::write(&txt_path, "page one\u{c}page two\u{c}").unwrap();
        assert_eq!(load_pages(&txt_path).unwrap(), vec!["page one", "page two"]);

        let json_path = dir.path().join("contract.json");
        fs::write(&json_path, r#"["only page"]"#).unwrap();
        assert_eq!(load_pages(&json_path).unwrap(), vec!["only page"]);

        let unknown_path = dir.path().join("contract.docx");
        fs::write(&unknown_path, "irrelevant").unwrap();
        assert!(matches!(load_pages(&unknown_path), Err(DocumentError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_invalid_pdf_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("broken.pdf");
        let mut file = fs::File::create(&pdf_path).unwrap();
        file.write_all(b"this is not a pdf").unwrap();

        assert!(matches!(load_pages(&pdf_path), Err(DocumentError::Pdf(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_pages(Path::new("/definitely/not/here.txt"));
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }
}
