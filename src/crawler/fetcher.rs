//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client (user agent, timeout, compression)
//! - Classifying the response MIME type
//! - Reading HTML as decoded text and everything else as raw bytes
//! - Error classification
//!
//! Redirects are followed by the client. A non-2xx status is a failure.

use crate::document::{is_html_mime, FetchedPayload};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why a single fetch failed
///
/// Every variant is local to one URL; the crawl goes on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    fn from_send(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            FetchError::Connect {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                source: error,
            }
        }
    }

    /// HTTP status for status failures
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Builds the HTTP client shared by every fetch worker
///
/// # Arguments
///
/// * `user_agent` - Sent as the User-Agent header on every request
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use webdex::crawler::build_http_client;
///
/// let client = build_http_client("webdex-test/1.0", Duration::from_secs(10));
/// assert!(client.is_ok());
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Extracts the MIME type from a Content-Type header value
///
/// Everything before the first `;` with surrounding whitespace removed.
pub fn classify_mime(content_type: &str) -> String {
    content_type
        .split_once(';')
        .map_or(content_type, |(mime, _)| mime)
        .trim()
        .to_string()
}

/// Fetches one URL
///
/// # Request Flow
///
/// 1. GET the URL (redirects followed, bounded by the client timeout)
/// 2. Non-2xx status → `FetchError::Status`
/// 3. MIME type from the Content-Type header (empty when absent)
/// 4. `text/html` → body decoded as text; anything else → raw bytes
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedPayload, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::from_send(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mime_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(classify_mime)
        .unwrap_or_default();

    let body_error = |source: reqwest::Error| {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Body {
                url: url.to_string(),
                source,
            }
        }
    };

    if is_html_mime(&mime_type) {
        let text = response.text().await.map_err(body_error)?;
        Ok(FetchedPayload::html(url, mime_type, text))
    } else {
        let bytes = response.bytes().await.map_err(body_error)?;
        Ok(FetchedPayload::binary(url, mime_type, bytes.to_vec()))
    }
}
