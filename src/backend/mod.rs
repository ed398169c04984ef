//! Backend module for writing documents to the search store
//!
//! This module handles all communication with the search backend:
//! - The `DocumentStore` trait the indexing sink writes through
//! - An Elasticsearch client (connectivity probe, index creation, upsert, get, search)
//! - The index schema
//! - Search pagination cursors

mod elasticsearch;
mod schema;
mod search;
mod traits;

pub use elasticsearch::ElasticsearchClient;
pub use schema::index_definition;
pub use search::{
    decode_cursor, encode_cursor, SearchHit, SearchPage, SearchRequest, DEFAULT_PAGE_SIZE,
};
pub use traits::{BackendError, BackendResult, DocumentStore};
