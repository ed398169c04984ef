//! Configuration module for Webdex
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use webdex::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webdex.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BackendConfig, Config, CrawlerConfig, FilterConfig, IndexConfig, DEFAULT_BACKEND_URL,
    DEFAULT_DELAY_SECS, DEFAULT_MAX_DEPTH, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
