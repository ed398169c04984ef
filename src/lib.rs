//! Webdex: crawl a set of sites and index their text into a search backend
//!
//! This crate implements a concurrent crawl-to-index pipeline: a deduplicating
//! frontier feeds fetch workers, fetched payloads are handed to an indexing
//! sink that normalizes them into documents and upserts them into Elasticsearch.

pub mod backend;
pub mod config;
pub mod crawler;
pub mod document;
pub mod indexer;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Webdex operations
#[derive(Debug, Error)]
pub enum WebdexError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] backend::BackendError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::WorkerState,
        to: state::WorkerState,
    },

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid URL pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Webdex operations
pub type Result<T> = std::result::Result<T, WebdexError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::url::{normalize_url, LinkFilter};
pub use config::Config;
pub use crawler::{run_crawl, Coordinator};
pub use document::{Document, FetchedPayload};
pub use state::{StopReason, WorkerState};
