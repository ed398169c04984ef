//! Document store trait and error types
//!
//! This module defines the interface the indexing sink writes through and
//! the errors a backend can report.

use crate::document::Document;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur talking to the search backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend unreachable at {url}: {source}")]
    Unreachable { url: String, source: reqwest::Error },

    #[error("Backend returned HTTP {status} for {operation}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("HTTP error during {operation}: {source}")]
    Http {
        operation: String,
        source: reqwest::Error,
    },

    #[error("Invalid pagination cursor: {0}")]
    InvalidCursor(String),

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Trait for search backends the indexing sink can write to
///
/// Implementations must be safe to share between tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes a document under `id`, replacing any document already stored there
    async fn upsert(&self, id: &str, document: &Document) -> BackendResult<()>;

    /// Reads a single document
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Document))` - The stored document
    /// * `Ok(None)` - No document with this id
    /// * `Err(BackendError)` - The backend could not answer
    async fn get(&self, id: &str) -> BackendResult<Option<Document>>;
}
