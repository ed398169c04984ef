//! Search request/response types and pagination cursors
//!
//! A cursor is an opaque decimal string holding the result offset the next
//! page starts at.

use crate::backend::BackendError;
use serde::Serialize;
use std::collections::HashMap;

/// Default number of hits per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A multi-field search over title and content
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub size: u32,
    /// Cursor returned by a previous page; None starts at the first hit
    pub cursor: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            size: DEFAULT_PAGE_SIZE,
            cursor: None,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// One search hit with its highlighted fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub highlight: HashMap<String, Vec<String>>,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    pub total: u64,
    /// Present when more hits remain after this page
    pub next_cursor: Option<String>,
}

/// Decodes a cursor into a result offset; no cursor means offset 0
pub fn decode_cursor(cursor: Option<&str>) -> Result<u64, BackendError> {
    match cursor.map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) if raw.bytes().all(|b| b.is_ascii_digit()) => raw
            .parse::<u64>()
            .map_err(|_| BackendError::InvalidCursor(raw.to_string())),
        Some(raw) => Err(BackendError::InvalidCursor(raw.to_string())),
    }
}

/// Encodes a result offset as a cursor
pub fn encode_cursor(offset: u64) -> String {
    offset.to_string()
}

/// Cursor for the page after one that started at `offset` and held `returned` hits
pub fn next_cursor(offset: u64, returned: usize, total: u64) -> Option<String> {
    let next = offset.checked_add(returned as u64)?;
    (returned > 0 && next < total).then(|| encode_cursor(next))
}
