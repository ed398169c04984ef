//! URL frontier: deduplicating FIFO of (url, depth) entries
//!
//! This module handles:
//! - Deduplication by normalized URL (first acceptance wins, depth fixed at first sight)
//! - A FIFO of pending entries with timeout-bounded blocking dequeue
//! - In-flight bookkeeping so callers can tell when all work is drained
//!
//! All state sits behind one lock, so check-seen-and-insert is atomic even
//! with several workers enqueueing at once.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized absolute URL
    pub url: String,

    /// Link hops from the seed this URL was first reached from
    pub depth: u32,
}

#[derive(Debug, Default)]
struct FrontierInner {
    seen: HashSet<String>,
    pending: VecDeque<FrontierEntry>,
    in_flight: usize,
}

/// Frontier shared by every fetch worker of one crawl run
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<FrontierInner>,
    available: Notify,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL unless it has been accepted before
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now pending
    /// * `false` - The URL was already seen; nothing changed
    pub fn enqueue(&self, url: impl Into<String>, depth: u32) -> bool {
        let url = url.into();
        {
            let mut inner = self.lock();
            if inner.seen.contains(&url) {
                return false;
            }
            inner.seen.insert(url.clone());
            inner.pending.push_back(FrontierEntry { url, depth });
        }
        self.available.notify_one();
        true
    }

    /// Takes the next pending entry without waiting
    ///
    /// A returned entry counts as in flight until [`Frontier::mark_done`].
    pub fn try_dequeue(&self) -> Option<FrontierEntry> {
        let mut inner = self.lock();
        let entry = inner.pending.pop_front()?;
        inner.in_flight += 1;
        Some(entry)
    }

    /// Waits up to `timeout` for a pending entry
    ///
    /// Returns None when the timeout elapses with nothing available.
    pub async fn dequeue(&self, timeout: Duration) -> Option<FrontierEntry> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(entry) = self.try_dequeue() {
                return Some(entry);
            }

            if tokio::time::timeout_at(deadline, self.available.notified())
                .await
                .is_err()
            {
                return self.try_dequeue();
            }
        }
    }

    /// Marks one dequeued entry as fully processed, whatever its outcome
    pub fn mark_done(&self) {
        let mut inner = self.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
    }

    /// Returns true if no entry is pending
    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    /// Returns true if nothing is pending and nothing is in flight
    pub fn is_drained(&self) -> bool {
        let inner = self.lock();
        inner.pending.is_empty() && inner.in_flight == 0
    }

    /// Number of distinct URLs ever accepted
    pub fn seen_count(&self) -> usize {
        self.lock().seen.len()
    }

    /// Number of entries waiting to be dequeued
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Number of entries dequeued but not yet marked done
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    fn lock(&self) -> MutexGuard<'_, FrontierInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
