use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes an absolute URL string into the form the frontier deduplicates on
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Reject URLs without a host
/// 4. Remove fragment (everything after #)
///
/// Parsing already lowercases the host, drops default ports and
/// resolves dot segments, so two spellings of the same page collapse to one key.
///
/// # Examples
///
/// ```
/// use webdex::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.com/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    finish(url)
}

/// Resolves a hyperlink target against the page it was found on
///
/// Returns None for links that can never be crawled:
/// - empty hrefs and fragment-only anchors (same page)
/// - `javascript:`, `mailto:`, `tel:` and `data:` targets
/// - anything that does not resolve to an HTTP(S) URL
pub fn resolve_link(base_url: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    base_url.join(href).ok().and_then(|url| finish(url).ok())
}

fn finish(mut url: Url) -> UrlResult<Url> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}
