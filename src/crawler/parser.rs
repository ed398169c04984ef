//! Link extraction from fetched HTML
//!
//! Only `<a href="...">` anchors are followed. Each href is resolved against
//! the page URL and normalized; anything that does not end up as an absolute
//! http(s) URL is dropped here, before the link filter ever sees it.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use url::Url;

/// Extracts every followable link from an HTML document, in document order
///
/// Duplicates are kept; the frontier deduplicates.
///
/// # Example
///
/// ```
/// use url::Url;
/// use webdex::crawler::extract_links;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let html = r#"<a href="intro#top">Intro</a><a href="mailto:x@example.com">Mail</a>"#;
/// let links = extract_links(html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/docs/intro");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(base_url, href))
        .collect()
}
