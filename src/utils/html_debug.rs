// src/utils/html_debug.rs
use crate::documents::models::AnalysisReport;
use crate::extractors::PointerCategory;
use crate::utils::error::AppError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A span to highlight on one page, in character offsets.
struct Highlight<'a> {
    start: usize,
    end: usize,
    css_class: &'static str,
    pointer: &'a str,
    rationale: &'a str,
}

fn css_class(category: PointerCategory) -> &'static str {
    match category {
        PointerCategory::Date => "highlight-date",
        PointerCategory::Amount => "highlight-amount",
        PointerCategory::Signatory => "highlight-signatory",
        PointerCategory::Generic => "highlight-generic",
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders one page with its highlights wrapped in spans. Overlapping spans after the first are skipped.
fn render_page(page_text: &str, mut highlights: Vec<Highlight<'_>>) -> String {
    // Byte offset of every character boundary, including the end of the text.
    let boundaries: Vec<usize> = page_text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(page_text.len()))
        .collect();

    highlights.sort_by_key(|h| (h.start, h.end));

    let mut html = String::new();
    let mut last_char = 0;

    for highlight in highlights {
        if highlight.end >= boundaries.len() || highlight.start > highlight.end {
            tracing::debug!("Skipping out-of-range highlight {}..{}", highlight.start, highlight.end);
            continue;
        }
        if highlight.start < last_char {
            tracing::debug!(
                "Skipping overlapping highlight {}..{} for '{}'",
                highlight.start, highlight.end, highlight.pointer
            );
            continue;
        }

        html.push_str(&escape_html(&page_text[boundaries[last_char]..boundaries[highlight.start]]));
        html.push_str(&format!(
            "<span class=\"{}\" title=\"{}: {} (chars {}-{})\">",
            highlight.css_class,
            escape_html(highlight.pointer),
            escape_html(highlight.rationale),
            highlight.start,
            highlight.end
        ));
        html.push_str(&escape_html(&page_text[boundaries[highlight.start]..boundaries[highlight.end]]));
        html.push_str("</span>");

        last_char = highlight.end;
    }

    html.push_str(&escape_html(&page_text[boundaries[last_char]..]));
    html
}

/// Builds the annotated view of every page with every real match highlighted.
pub fn build_debug_html(pages: &[String], report: &AnalysisReport) -> String {
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");

    // CSS for highlight colors
    debug_html.push_str("section { white-space: pre-wrap; border-top: 1px solid #999; }\n");
    debug_html.push_str(".highlight-date { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-amount { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-signatory { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-generic { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");
    debug_html.push_str(&format!("<h1>{}</h1>\n", escape_html(&report.file)));

    for (index, page_text) in pages.iter().enumerate() {
        let page_number = index + 1;
        let highlights: Vec<Highlight> = report
            .results
            .iter()
            .flat_map(|(pointer, matches)| {
                let css_class = css_class(PointerCategory::classify(pointer));
                matches
                    .iter()
                    .filter(move |m| m.page == Some(page_number))
                    .filter_map(move |m| {
                        Some(Highlight {
                            start: m.start_char?,
                            end: m.end_char?,
                            css_class,
                            pointer: pointer.as_str(),
                            rationale: m.rationale.as_str(),
                        })
                    })
            })
            .collect();

        debug_html.push_str(&format!("<h2>Page {}</h2>\n<section>", page_number));
        debug_html.push_str(&render_page(page_text, highlights));
        debug_html.push_str("</section>\n");
    }

    debug_html.push_str("</body>\n</html>");
    debug_html
}

/// Writes the annotated view of a report to `filename`.
pub fn save_debug_html(pages: &[String], report: &AnalysisReport, filename: &Path) -> Result<(), AppError> {
    let mut file = File::create(filename)?;
    file.write_all(build_debug_html(pages, report).as_bytes())?;

    tracing::info!("Saved debug HTML to {}", filename.display());
    Ok(())
}
