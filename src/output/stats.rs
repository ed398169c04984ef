//! Crawl run statistics
//!
//! This module provides the counters collected over one crawl run and
//! their console rendering.

use crate::crawler::WorkerStats;
use crate::state::StopReason;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStats {
    /// Fetches that produced a payload
    pub pages_fetched: u64,

    /// Fetches that failed
    pub fetch_failures: u64,

    /// Entries dequeued beyond the depth limit
    pub depth_skipped: u64,

    /// New URLs discovered and accepted into the frontier
    pub links_enqueued: u64,

    /// Documents written to the backend
    pub documents_indexed: u64,

    /// Backend writes that failed
    pub index_failures: u64,

    /// Fetched payloads never indexed because the run stopped first
    pub payloads_dropped: u64,

    /// Distinct URLs ever accepted into the frontier (seeds included)
    pub urls_seen: u64,

    /// Why the run ended
    pub stop_reason: StopReason,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Empty statistics for a run that ended for `stop_reason`
    pub fn new(stop_reason: StopReason) -> Self {
        Self {
            pages_fetched: 0,
            fetch_failures: 0,
            depth_skipped: 0,
            links_enqueued: 0,
            documents_indexed: 0,
            index_failures: 0,
            payloads_dropped: 0,
            urls_seen: 0,
            stop_reason,
            elapsed: Duration::ZERO,
        }
    }

    /// Adds one worker's counters
    pub fn record_worker(&mut self, worker: &WorkerStats) {
        self.pages_fetched += worker.pages_fetched;
        self.fetch_failures += worker.fetch_failures;
        self.depth_skipped += worker.depth_skipped;
        self.links_enqueued += worker.links_enqueued;
    }

    /// Documents indexed per second of wall-clock time
    pub fn indexing_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.documents_indexed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Stopped because: {}", stats.stop_reason);
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!("  URLs seen: {}", stats.urls_seen);
    println!();

    println!("Fetching:");
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!("  Skipped (depth): {}", stats.depth_skipped);
    println!("  Links enqueued: {}", stats.links_enqueued);
    println!();

    println!("Indexing:");
    println!("  Documents indexed: {}", stats.documents_indexed);
    println!("  Index failures: {}", stats.index_failures);
    if stats.payloads_dropped > 0 {
        println!("  Payloads dropped: {}", stats.payloads_dropped);
    }
    println!();

    let attempted = stats.pages_fetched + stats.fetch_failures;
    let success_rate = if attempted > 0 {
        (stats.pages_fetched as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} fetches), {:.2} documents/sec",
        success_rate,
        stats.pages_fetched,
        attempted,
        stats.indexing_rate()
    );
}
