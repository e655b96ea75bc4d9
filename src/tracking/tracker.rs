// Crossfade Promise Settlement Tracker
//
// Collects in-flight futures that must settle before the page counts as
// ready. Settling is a fixed-point loop: futures tracked while a round is
// in flight are picked up by the next round, bounded by a round cap and an
// overall timeout so readiness can never hang.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use log::{debug, warn};
use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::error::{SequencerError, SequencerResult};

type TrackedFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Mutable set of promises that must settle before readiness
pub struct PromiseTracker {
    pending: Mutex<Vec<TrackedFuture>>,
}

impl PromiseTracker {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Register a future that must settle before the page is ready.
    ///
    /// May be called at any time, including while [`settle_all`](Self::settle_all)
    /// is already running; the new future joins the next settlement round.
    pub fn track(&self, future: impl Future<Output = ()> + Send + 'static) {
        self.pending.lock().unwrap().push(Box::pin(future));
    }

    /// Number of futures waiting for the next settlement round.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Wait until every tracked future has settled, or the cap elapses.
    ///
    /// Futures tracked during settlement are included (fixed point over the
    /// pending set, at most `max_rounds` rounds). On timeout the remaining
    /// futures are abandoned and a [`SequencerError::Timeout`] is returned;
    /// callers log it and proceed as ready.
    pub async fn settle_all(&self, cap: Duration, max_rounds: usize) -> SequencerResult<()> {
        if timeout(cap, self.settle_rounds(max_rounds)).await.is_err() {
            return Err(SequencerError::Timeout {
                operation: "tracked promises".to_string(),
                duration_ms: cap.as_millis() as u64,
            });
        }
        Ok(())
    }

    async fn settle_rounds(&self, max_rounds: usize) {
        for round in 0..max_rounds {
            let batch: Vec<TrackedFuture> = {
                let mut pending = self.pending.lock().unwrap();
                pending.drain(..).collect()
            };
            if batch.is_empty() {
                return;
            }
            debug!("settling {} tracked promise(s), round {}", batch.len(), round);

            let mut in_flight = JoinSet::new();
            for future in batch {
                in_flight.spawn(future);
            }
            while let Some(result) = in_flight.join_next().await {
                if result.is_err() {
                    warn!("tracked promise panicked; treating it as settled");
                }
            }
        }

        let leftover = self.pending_count();
        if leftover > 0 {
            warn!(
                "{} promise(s) still tracked after {} settlement rounds; proceeding",
                leftover, max_rounds
            );
        }
    }
}

impl Default for PromiseTracker {
    fn default() -> Self {
        Self::new()
    }
}
