//! Fetched payloads and the normalized documents built from them
//!
//! A `FetchedPayload` is what a fetch worker produced for one URL. The
//! indexing sink turns it into a `Document` with [`transform`] right before
//! writing it to the backend.

mod transform;

pub use transform::{transform, transform_at, NO_TITLE};

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Raw result of fetching one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPayload {
    /// The URL that was fetched (as dequeued, before redirects)
    pub url: String,

    /// Decoded body; only present for HTML responses
    pub text_content: Option<String>,

    /// Raw body; only kept for non-HTML responses
    pub raw_bytes: Option<Vec<u8>>,

    /// Content-Type up to the first `;`, trimmed
    pub mime_type: String,
}

impl FetchedPayload {
    /// Payload for an HTML page
    pub fn html(url: impl Into<String>, mime_type: impl Into<String>, text: String) -> Self {
        Self {
            url: url.into(),
            text_content: Some(text),
            raw_bytes: None,
            mime_type: mime_type.into(),
        }
    }

    /// Payload for any other content type
    pub fn binary(url: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            text_content: None,
            raw_bytes: Some(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Returns true if the MIME type names HTML
    pub fn is_html(&self) -> bool {
        is_html_mime(&self.mime_type)
    }
}

/// Returns true if a MIME type names HTML
pub fn is_html_mime(mime_type: &str) -> bool {
    mime_type.to_ascii_lowercase().contains("text/html")
}

/// Normalized, backend-ready representation of a fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: String,
    /// Extracted text; absent for non-HTML payloads
    pub content: Option<String>,
    /// Characters of `content`, or bytes of the raw payload
    pub content_length: u64,
    pub mime_type: String,
    /// UTC, ISO-8601, captured at transform time
    pub timestamp: String,
}

impl Document {
    /// Identifier this document is stored under
    pub fn id(&self) -> String {
        document_id(&self.url)
    }
}

/// Derives the backend identifier for a URL
///
/// URL-safe base64 of the URL bytes: the same URL always maps to the same
/// identifier, so re-indexing overwrites instead of duplicating.
///
/// # Examples
///
/// ```
/// use webdex::document::document_id;
///
/// assert_eq!(document_id("http://x.test/"), "aHR0cDovL3gudGVzdC8=");
/// ```
pub fn document_id(url: &str) -> String {
    URL_SAFE.encode(url.as_bytes())
}
