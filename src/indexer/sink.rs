//! Indexing sink: transforms payloads into documents and writes them to the store
//!
//! The sink owns the document cap. Once the cap is reached it cancels the
//! crawl and refuses every further payload.

use crate::backend::DocumentStore;
use crate::document::{document_id, transform, FetchedPayload};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Consumer-side stage that writes one document per payload
pub struct IndexingSink {
    store: Arc<dyn DocumentStore>,
    max_documents: Option<u64>,
    cancel: CancellationToken,
    indexed: u64,
    failures: u64,
    rejected: u64,
}

impl IndexingSink {
    /// Creates a sink writing to `store`
    ///
    /// `cancel` is triggered the moment the cap is reached.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        max_documents: Option<u64>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            store,
            max_documents,
            cancel,
            indexed: 0,
            failures: 0,
            rejected: 0,
        }
    }

    /// Transforms and upserts one payload
    ///
    /// # Returns
    ///
    /// * `true` - A document was written
    /// * `false` - Cap already reached, or the write failed
    pub async fn process(&mut self, payload: FetchedPayload) -> bool {
        if self.limit_reached() {
            tracing::debug!("Document cap reached, not indexing {}", payload.url);
            self.rejected += 1;
            return false;
        }

        let document = transform(&payload);
        let id = document_id(&document.url);

        if let Err(e) = self.store.upsert(&id, &document).await {
            tracing::error!("Failed to index {}: {}", document.url, e);
            self.failures += 1;
            return false;
        }

        self.indexed += 1;
        tracing::info!("Indexed: {} ({})", document.url, self.indexed);

        if self.limit_reached() {
            tracing::info!("Reached max documents ({}), stopping crawl", self.indexed);
            self.cancel.cancel();
        }

        true
    }

    /// Returns true once the configured cap has been reached
    pub fn limit_reached(&self) -> bool {
        self.max_documents.is_some_and(|max| self.indexed >= max)
    }

    /// Documents written so far
    pub fn indexed_count(&self) -> u64 {
        self.indexed
    }

    /// Writes that failed
    pub fn failure_count(&self) -> u64 {
        self.failures
    }

    /// Payloads refused because the cap was already reached
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }
}
