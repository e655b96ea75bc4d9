// Crossfade Progress Estimator
//
// The loading percentage is synthetic: elapsed time divided by a
// host-estimated total. Real readiness is signalled separately; the
// percentage only exists so the preloader has something smooth to show.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::LoadEstimator;

/// Percentage at which polling stops and completion is checked instead of
/// waiting to hit exactly 100 (the estimate is allowed to be wrong).
pub const COMPLETE_THRESHOLD: f64 = 99.0;

/// Computes a monotonically non-decreasing 0-100 percentage from elapsed
/// time against the injected estimate.
pub struct ProgressEstimator {
    started_at: Instant,
    estimated_total: Duration,
    last_percent: f64,
}

impl ProgressEstimator {
    pub fn new(started_at: Instant, estimator: &LoadEstimator) -> Self {
        // A zero estimate would divide by zero and means "instant" anyway.
        let estimated_total = estimator(started_at).max(Duration::from_millis(1));
        Self {
            started_at,
            estimated_total,
            last_percent: 0.0,
        }
    }

    /// Percentage at `now`. Never decreases across calls and never
    /// exceeds 100.
    pub fn percent_at(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started_at);
        let raw = elapsed.as_secs_f64() / self.estimated_total.as_secs_f64() * 100.0;
        self.last_percent = raw.min(100.0).max(self.last_percent);
        self.last_percent
    }

    /// Whether polling should stop and hand over to the completion check.
    pub fn is_nearly_complete(&self) -> bool {
        self.last_percent >= COMPLETE_THRESHOLD
    }

    pub fn last_percent(&self) -> f64 {
        self.last_percent
    }
}
