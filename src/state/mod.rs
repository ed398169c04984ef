//! State module for tracking crawl progress
//!
//! - `WorkerState`: lifecycle of a fetch worker (running, stopping, stopped)
//! - `StopReason`: why the crawl run ended

mod worker_state;

// Re-export main types
pub use worker_state::{StopReason, WorkerState};
