//! Result channel between fetch workers and the indexing loop
//!
//! Unbounded so a worker never waits on a slow backend. Every sent payload
//! stays "unfinished" until the consumer acknowledges it with
//! [`ResultReceiver::task_done`], which lets the coordinator tell an idle
//! channel from one whose last item is still being indexed.

use crate::document::FetchedPayload;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Creates a connected sender/receiver pair
pub fn result_channel() -> (ResultSender, ResultReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let unfinished = Arc::new(AtomicUsize::new(0));

    (
        ResultSender {
            tx,
            unfinished: unfinished.clone(),
        },
        ResultReceiver { rx, unfinished },
    )
}

/// Producer half, cloned into every fetch worker
#[derive(Debug, Clone)]
pub struct ResultSender {
    tx: mpsc::UnboundedSender<FetchedPayload>,
    unfinished: Arc<AtomicUsize>,
}

impl ResultSender {
    /// Hands a payload to the consumer without blocking
    ///
    /// Fails, returning the payload, only if the receiver is gone.
    pub fn send(&self, payload: FetchedPayload) -> Result<(), FetchedPayload> {
        self.unfinished.fetch_add(1, Ordering::SeqCst);
        self.tx.send(payload).map_err(|err| {
            release(&self.unfinished);
            err.0
        })
    }
}

/// Outcome of a bounded receive
#[derive(Debug)]
pub enum Received {
    /// A payload arrived
    Item(FetchedPayload),

    /// Nothing arrived before the timeout
    Timeout,

    /// Every sender is gone and the buffer is empty
    Closed,
}

/// Consumer half, owned by the indexing loop
#[derive(Debug)]
pub struct ResultReceiver {
    rx: mpsc::UnboundedReceiver<FetchedPayload>,
    unfinished: Arc<AtomicUsize>,
}

impl ResultReceiver {
    /// Waits up to `timeout` for the next payload
    pub async fn recv_timeout(&mut self, timeout: Duration) -> Received {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(payload)) => Received::Item(payload),
            Ok(None) => Received::Closed,
            Err(_) => Received::Timeout,
        }
    }

    /// Acknowledges that one received payload has been fully handled
    pub fn task_done(&self) {
        release(&self.unfinished);
    }

    /// Payloads sent but not yet acknowledged (buffered or in processing)
    pub fn unfinished(&self) -> usize {
        self.unfinished.load(Ordering::SeqCst)
    }

    /// Discards every buffered payload, acknowledging each
    ///
    /// Returns how many payloads were discarded.
    pub fn drain(&mut self) -> usize {
        let mut dropped = 0;
        while let Ok(payload) = self.rx.try_recv() {
            tracing::debug!("Dropping unindexed payload for {}", payload.url);
            self.task_done();
            dropped += 1;
        }
        dropped
    }
}

fn release(counter: &AtomicUsize) {
    let _ = counter.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
}
