//! Crawler module for web page fetching and processing
//!
//! This module contains the fetch side of the pipeline, including:
//! - The deduplicating URL frontier
//! - HTTP fetching and link extraction
//! - Fetch workers and the result channel they feed
//! - Overall crawl coordination

mod channel;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod worker;

pub use channel::{result_channel, Received, ResultReceiver, ResultSender};
pub use coordinator::{run_crawl, Coordinator, RESULT_POLL_TIMEOUT};
pub use fetcher::{build_http_client, classify_mime, fetch_url, FetchError};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::extract_links;
pub use worker::{FetchWorker, WorkerStats, DEQUEUE_TIMEOUT};
