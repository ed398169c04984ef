//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the driver loop that ties the pipeline together:
//! - Seeding the frontier
//! - Spawning fetch workers
//! - Feeding fetched payloads to the indexing sink
//! - Deciding when the run is over and shutting the workers down

use crate::backend::{DocumentStore, ElasticsearchClient};
use crate::config::Config;
use crate::crawler::channel::{result_channel, Received, ResultReceiver};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::Frontier;
use crate::crawler::worker::FetchWorker;
use crate::indexer::IndexingSink;
use crate::output::CrawlStats;
use crate::state::StopReason;
use crate::url::{normalize_url, LinkFilter};
use crate::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Bounded wait on the result channel between termination checks
pub const RESULT_POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    store: Arc<dyn DocumentStore>,
    frontier: Arc<Frontier>,
    filter: Arc<LinkFilter>,
    client: Client,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Builds the HTTP client and link filter and seeds the frontier with
    /// every normalized seed at depth 0. Nothing is fetched yet.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    /// * `store` - Where indexed documents are written
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let client = build_http_client(
            &config.crawler.user_agent,
            Duration::from_secs(config.crawler.request_timeout),
        )?;
        let filter = LinkFilter::from_config(&config.filter)?;

        let frontier = Frontier::new();
        for seed in &config.crawler.seeds {
            let url = normalize_url(seed)?;
            if !frontier.enqueue(url, 0) {
                tracing::debug!("Duplicate seed ignored: {}", seed);
            }
        }
        tracing::info!("Seeded frontier with {} URLs", frontier.seen_count());

        Ok(Self {
            config: Arc::new(config),
            store,
            frontier: Arc::new(frontier),
            filter: Arc::new(filter),
            client,
            cancel: CancellationToken::new(),
        })
    }

    /// Token that stops the crawl when cancelled
    ///
    /// Cancelling from outside (for example on Ctrl-C) lets in-flight fetches
    /// finish, indexes what they produced and ends the run as interrupted.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Ties this run to an outer shutdown token
    ///
    /// Cancelling `shutdown` stops the run; reaching the document cap only
    /// cancels the run's own child token.
    pub fn with_shutdown(mut self, shutdown: &CancellationToken) -> Self {
        self.cancel = shutdown.child_token();
        self
    }

    /// The frontier this run crawls from
    pub fn frontier(&self) -> &Arc<Frontier> {
        &self.frontier
    }

    /// Runs the crawl to completion
    ///
    /// The indexing loop runs on the calling task; fetch workers run on
    /// spawned tasks. Stops when the document cap is hit or when the
    /// frontier, the workers and the result channel are all idle.
    pub async fn run(self) -> Result<CrawlStats> {
        let start = Instant::now();
        let crawler = &self.config.crawler;

        tracing::info!(
            "Starting crawl: {} workers, max depth {}, delay {:.2}s, max documents {}",
            crawler.workers,
            crawler.max_depth,
            crawler.delay,
            crawler
                .max_documents
                .map_or_else(|| "unbounded".to_string(), |n| n.to_string())
        );

        let (sender, mut receiver) = result_channel();
        let delay = Duration::from_secs_f64(crawler.delay);

        let handles: Vec<JoinHandle<Result<_>>> = (0..crawler.workers)
            .map(|id| {
                let worker = FetchWorker::new(
                    id,
                    self.frontier.clone(),
                    sender.clone(),
                    self.filter.clone(),
                    self.client.clone(),
                    self.cancel.clone(),
                    crawler.max_depth,
                    delay,
                );
                tokio::spawn(worker.run())
            })
            .collect();
        // Workers hold the only senders; the channel closes when they all exit
        drop(sender);

        let mut sink = IndexingSink::new(
            self.store.clone(),
            crawler.max_documents,
            self.cancel.clone(),
        );

        let stop_reason = self.drive(&mut receiver, &mut sink, &handles).await;

        self.cancel.cancel();

        let mut stats = CrawlStats::new(stop_reason);
        for handle in handles {
            let worker_stats = handle.await??;
            stats.record_worker(&worker_stats);
        }

        let dropped = receiver.drain() as u64;
        if dropped > 0 {
            tracing::info!("{} fetched payloads left unindexed", dropped);
        }

        stats.documents_indexed = sink.indexed_count();
        stats.index_failures = sink.failure_count();
        stats.payloads_dropped = dropped + sink.rejected_count();
        stats.urls_seen = self.frontier.seen_count() as u64;
        stats.elapsed = start.elapsed();

        tracing::info!(
            "Crawl finished ({}): {} documents indexed, {} pages fetched in {:?}",
            stats.stop_reason,
            stats.documents_indexed,
            stats.pages_fetched,
            stats.elapsed
        );

        Ok(stats)
    }

    async fn drive(
        &self,
        receiver: &mut ResultReceiver,
        sink: &mut IndexingSink,
        workers: &[JoinHandle<Result<crate::crawler::WorkerStats>>],
    ) -> StopReason {
        loop {
            match receiver.recv_timeout(RESULT_POLL_TIMEOUT).await {
                Received::Item(payload) => {
                    sink.process(payload).await;
                    receiver.task_done();

                    if sink.limit_reached() {
                        return StopReason::DocumentLimit;
                    }
                }
                Received::Timeout => {
                    let workers_done = workers.iter().all(JoinHandle::is_finished);
                    if workers_done && self.frontier.is_empty() && receiver.unfinished() == 0 {
                        tracing::info!("Frontier exhausted and all results indexed");
                        return self.idle_reason();
                    }
                    tracing::debug!(
                        pending = self.frontier.pending_count(),
                        in_flight = self.frontier.in_flight(),
                        "Waiting for results"
                    );
                }
                Received::Closed => {
                    tracing::info!("All fetch workers exited");
                    return self.idle_reason();
                }
            }
        }
    }

    fn idle_reason(&self) -> StopReason {
        if self.cancel.is_cancelled() {
            StopReason::Interrupted
        } else {
            StopReason::Exhausted
        }
    }
}

/// Runs a complete crawl against the configured Elasticsearch backend
///
/// Connecting and creating the index happen before anything is fetched; a
/// failure there aborts the run. Cancelling `shutdown` interrupts the crawl.
pub async fn run_crawl(config: Config, shutdown: CancellationToken) -> Result<CrawlStats> {
    let store = ElasticsearchClient::connect(
        &config.backend.url,
        &config.index.name,
        Some(config.index.description.as_str()),
    )
    .await?;

    Coordinator::new(config, Arc::new(store))?
        .with_shutdown(&shutdown)
        .run()
        .await
}
