// Crossfade sequencer configuration
//
// All timing knobs in one place, plus the host-supplied load-duration
// estimator. The defaults match the behavior marketing pages expect;
// tests override individual fields via struct update syntax.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Host-supplied hook estimating how long the initial load will take.
///
/// Receives the instant the load started and returns the estimated total
/// duration. The synthetic progress percentage is elapsed time divided by
/// this estimate.
pub type LoadEstimator = Arc<dyn Fn(Instant) -> Duration + Send + Sync>;

/// Configuration for a [`Sequencer`](crate::Sequencer) instance.
#[derive(Clone)]
pub struct SequencerConfig {
    /// Estimator for the initial load duration (see [`LoadEstimator`])
    pub estimate_load_duration: LoadEstimator,

    /// Period of the frame-polling loops (progress, anchor resolution)
    pub frame_period: Duration,

    /// Hold at 100% before the preloader animations start
    pub hold_delay: Duration,

    /// Maximum extra wait after document-ready before loading completes
    /// regardless of the synthetic progress value
    pub max_extra_delay: Duration,

    /// Overall cap on waiting for tracked promises to settle
    pub settle_timeout: Duration,

    /// Maximum fixed-point rounds over the tracked-promise set
    pub max_settle_rounds: usize,

    /// Slack added after the longest preloader animation duration
    pub animation_buffer: Duration,

    /// Consecutive frames an anchor may be missing before giving up
    pub anchor_miss_cap: u32,

    /// Consecutive sub-threshold frames before a scroll counts as settled
    pub anchor_stable_ticks: u32,

    /// Scroll delta (px) below which a frame counts as stable
    pub anchor_noise_px: f64,

    /// Scroll offset (px) above an anchor when no per-element offset is set
    pub default_anchor_offset: f64,

    /// Grace delay before cleanup after opening an external destination
    pub external_cleanup_delay: Duration,

    /// Reset scroll to top when the initial load completes
    pub reset_scroll_on_load: bool,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            estimate_load_duration: Arc::new(|_| Duration::from_millis(2000)),
            frame_period: Duration::from_millis(16),
            hold_delay: Duration::from_millis(250),
            max_extra_delay: Duration::from_secs(3),
            settle_timeout: Duration::from_secs(10),
            max_settle_rounds: 8,
            animation_buffer: Duration::from_millis(50),
            anchor_miss_cap: 10,
            anchor_stable_ticks: 60,
            anchor_noise_px: 10.0,
            default_anchor_offset: 100.0,
            external_cleanup_delay: Duration::from_millis(1500),
            reset_scroll_on_load: true,
        }
    }
}

impl SequencerConfig {
    /// Replace the load-duration estimator.
    pub fn with_estimator(
        mut self,
        estimator: impl Fn(Instant) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.estimate_load_duration = Arc::new(estimator);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings() {
        let config = SequencerConfig::default();
        assert_eq!(config.hold_delay, Duration::from_millis(250));
        assert_eq!(config.anchor_miss_cap, 10);
        assert_eq!(config.anchor_stable_ticks, 60);
        assert_eq!(config.settle_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_with_estimator_overrides_hook() {
        let config =
            SequencerConfig::default().with_estimator(|_| Duration::from_millis(1000));
        let estimate = (config.estimate_load_duration)(Instant::now());
        assert_eq!(estimate, Duration::from_millis(1000));
    }
}
