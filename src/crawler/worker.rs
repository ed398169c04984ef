//! Fetch worker: pulls entries from the frontier, fetches them, hands the
//! payloads to the result channel and enqueues the links it finds
//!
//! A worker never indexes anything itself and never blocks on the consumer.

use crate::crawler::channel::ResultSender;
use crate::crawler::fetcher::fetch_url;
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::extract_links;
use crate::state::WorkerState;
use crate::url::LinkFilter;
use crate::{Result, WebdexError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// How long one frontier wait lasts before the worker rechecks for exhaustion
pub const DEQUEUE_TIMEOUT: Duration = Duration::from_secs(1);

/// Per-worker counters, folded into the run statistics at the end
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Fetches that produced a payload
    pub pages_fetched: u64,

    /// Fetches that failed (network, timeout, non-2xx)
    pub fetch_failures: u64,

    /// Entries dequeued beyond the depth limit and never fetched
    pub depth_skipped: u64,

    /// Links accepted by the filter and new to the frontier
    pub links_enqueued: u64,
}

/// What happened to one dequeued entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Fetched,
    Failed,
    TooDeep,
}

/// One fetch worker of a crawl run
pub struct FetchWorker {
    id: usize,
    frontier: Arc<Frontier>,
    results: ResultSender,
    filter: Arc<LinkFilter>,
    client: Client,
    cancel: CancellationToken,
    max_depth: u32,
    delay: Duration,
    state: WorkerState,
    stats: WorkerStats,
}

impl FetchWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        frontier: Arc<Frontier>,
        results: ResultSender,
        filter: Arc<LinkFilter>,
        client: Client,
        cancel: CancellationToken,
        max_depth: u32,
        delay: Duration,
    ) -> Self {
        Self {
            id,
            frontier,
            results,
            filter,
            client,
            cancel,
            max_depth,
            delay,
            state: WorkerState::Running,
            stats: WorkerStats::default(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Runs until cancelled or until the frontier is drained
    ///
    /// An in-progress fetch always completes; only the frontier wait and the
    /// politeness delay are cut short by cancellation.
    pub async fn run(mut self) -> Result<WorkerStats> {
        tracing::debug!(worker = self.id, "Fetch worker started");

        loop {
            if self.cancel.is_cancelled() {
                tracing::debug!(worker = self.id, "Cancellation observed");
                break;
            }

            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                entry = self.frontier.dequeue(DEQUEUE_TIMEOUT) => entry,
            };

            let Some(entry) = next else {
                if self.frontier.is_drained() {
                    tracing::debug!(worker = self.id, "Frontier drained");
                    break;
                }
                continue;
            };

            let outcome = self.process(entry).await;
            self.frontier.mark_done();
            self.transition(WorkerState::Running)?;

            if outcome != Outcome::TooDeep && !self.delay.is_zero() {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep(self.delay) => {}
                }
            }
        }

        self.transition(WorkerState::Stopping)?;
        self.transition(WorkerState::Stopped)?;

        tracing::debug!(
            worker = self.id,
            fetched = self.stats.pages_fetched,
            failed = self.stats.fetch_failures,
            "Fetch worker stopped"
        );

        Ok(self.stats)
    }

    async fn process(&mut self, entry: FrontierEntry) -> Outcome {
        if entry.depth > self.max_depth {
            tracing::debug!(
                "Skipping {} (depth {} exceeds {})",
                entry.url,
                entry.depth,
                self.max_depth
            );
            self.stats.depth_skipped += 1;
            return Outcome::TooDeep;
        }

        tracing::info!("Crawling: {} (depth {})", entry.url, entry.depth);

        let payload = match fetch_url(&self.client, &entry.url).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                self.stats.fetch_failures += 1;
                return Outcome::Failed;
            }
        };
        self.stats.pages_fetched += 1;

        // Links are resolved against the URL as dequeued, not the post-redirect URL
        let links = match (payload.text_content.as_deref(), payload.is_html()) {
            (Some(html), true) => match Url::parse(&entry.url) {
                Ok(base) => extract_links(html, &base),
                Err(e) => {
                    tracing::debug!("Cannot resolve links against {}: {}", entry.url, e);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };

        if let Err(payload) = self.results.send(payload) {
            tracing::debug!("Result consumer gone, dropping payload for {}", payload.url);
        }

        for link in links {
            if self.filter.is_valid(&link) && self.frontier.enqueue(link, entry.depth + 1) {
                self.stats.links_enqueued += 1;
            }
        }

        Outcome::Fetched
    }

    fn transition(&mut self, next: WorkerState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(WebdexError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }
}
