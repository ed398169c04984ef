//! Content transformer: `FetchedPayload -> Document`
//!
//! HTML payloads are parsed, stripped of `<script>` and `<style>` subtrees and
//! flattened into text with one line per block. Everything else becomes a
//! content-less document sized by its raw bytes.

use crate::document::{Document, FetchedPayload};
use chrono::{DateTime, SecondsFormat, Utc};
use scraper::{ElementRef, Html, Selector};

/// Title used when an HTML page has no `<title>`
pub const NO_TITLE: &str = "No Title";

/// Subtrees whose text is never indexed
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that start and end a line of extracted text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "dd", "details", "dialog",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre",
    "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "ul",
];

/// Transforms a payload, stamping it with the current UTC time
pub fn transform(payload: &FetchedPayload) -> Document {
    transform_at(payload, Utc::now())
}

/// Transforms a payload with an explicit timestamp
pub fn transform_at(payload: &FetchedPayload, now: DateTime<Utc>) -> Document {
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);

    match payload.text_content.as_deref() {
        Some(html) if payload.is_html() => {
            let document = Html::parse_document(html);
            let title = extract_title(&document).unwrap_or_else(|| NO_TITLE.to_string());
            let content = extract_text(&document);
            let content_length = content.chars().count() as u64;

            Document {
                url: payload.url.clone(),
                title,
                content: Some(content),
                content_length,
                mime_type: payload.mime_type.clone(),
                timestamp,
            }
        }
        _ => Document {
            url: payload.url.clone(),
            title: format!("Binary Content: {}", payload.url),
            content: None,
            content_length: payload.raw_bytes.as_ref().map_or(0, |b| b.len() as u64),
            mime_type: payload.mime_type.clone(),
            timestamp,
        },
    }
}

/// Text of the first `<title>`, trimmed; None if missing or blank
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Visible text with block boundaries as newlines and no blank lines
fn extract_text(document: &Html) -> String {
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            push_collapsed(out, text);
            continue;
        }

        let Some(child_element) = ElementRef::wrap(child) else {
            continue;
        };

        let name = child_element.value().name();
        if SKIPPED_ELEMENTS.contains(&name) {
            continue;
        }
        if name == "br" {
            out.push('\n');
            continue;
        }

        let block = BLOCK_ELEMENTS.contains(&name);
        if block {
            out.push('\n');
        }
        collect_text(child_element, out);
        if block {
            out.push('\n');
        }
    }
}

/// Appends text with every whitespace run folded to a single space
fn push_collapsed(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}
