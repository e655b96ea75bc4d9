// Crossfade Scroll-Anchor Resolver
//
// Resolves "scroll to #anchor" by polling every frame until the viewport
// stabilizes, instead of trusting any completion callback from the smooth
// scroll engine. A target that never renders is given up on after a capped
// number of consecutive misses, because navigation must never hang.

use log::warn;
use tokio::time::interval;

use crate::config::SequencerConfig;
use crate::error::{SequencerError, SequencerResult};
use crate::host::ScrollEngine;

/// Hard bound on the settle loop in case an easing never converges.
const MAX_SETTLE_TICKS: u32 = 600;

/// Smooth-scroll to an anchor and wait for the viewport to stabilize.
///
/// Returns [`SequencerError::AnchorNotFound`] if the element never appeared
/// within the miss cap; the navigation proceeds without scrolling in that
/// case, so callers log the error instead of aborting.
pub async fn scroll_to_anchor(
    engine: &dyn ScrollEngine,
    anchor: &str,
    config: &SequencerConfig,
) -> SequencerResult<()> {
    let mut ticker = interval(config.frame_period);
    let mut misses = 0u32;
    let mut stable = 0u32;
    let mut ticks = 0u32;
    let mut baseline = engine.scroll_offset();

    loop {
        ticker.tick().await;
        ticks += 1;
        if ticks > MAX_SETTLE_TICKS {
            warn!("scroll to '#{}' never stabilized; resolving anyway", anchor);
            return Ok(());
        }

        let Some(position) = engine.anchor_position(anchor) else {
            misses += 1;
            if misses >= config.anchor_miss_cap {
                return Err(SequencerError::AnchorNotFound(anchor.to_string()));
            }
            continue;
        };
        misses = 0;

        let offset = engine
            .anchor_offset(anchor)
            .unwrap_or(config.default_anchor_offset);
        engine.scroll_to((position - offset).max(0.0), true);

        let current = engine.scroll_offset();
        if (current - baseline).abs() < config.anchor_noise_px {
            stable += 1;
            if stable >= config.anchor_stable_ticks {
                return Ok(());
            }
        } else {
            stable = 0;
            baseline = current;
        }
    }
}

/// Smooth-scroll to a fixed offset and wait for the viewport to stabilize.
pub async fn smooth_scroll_to(engine: &dyn ScrollEngine, y: f64, config: &SequencerConfig) {
    engine.scroll_to(y.max(0.0), true);

    let mut ticker = interval(config.frame_period);
    let mut stable = 0u32;
    let mut ticks = 0u32;
    let mut baseline = engine.scroll_offset();

    loop {
        ticker.tick().await;
        ticks += 1;
        if ticks > MAX_SETTLE_TICKS {
            warn!("smooth scroll to {} never stabilized; resolving anyway", y);
            return;
        }

        let current = engine.scroll_offset();
        if (current - baseline).abs() < config.anchor_noise_px {
            stable += 1;
            if stable >= config.anchor_stable_ticks {
                return;
            }
        } else {
            stable = 0;
            baseline = current;
        }
    }
}
