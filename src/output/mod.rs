//! Output module for crawl results
//!
//! This module handles:
//! - Collecting run statistics from workers and the sink
//! - Rendering them on the console

pub mod stats;

pub use stats::{print_statistics, CrawlStats};
