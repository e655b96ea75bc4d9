// Crossfade preloader animation registry
//
// UI components register their reveal animations on mount and unregister on
// unmount. Registration hands back a token; removal is by token, so two
// components registering the same closure can't unregister each other.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Scroll-position condition gating whether an animation fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunCondition {
    /// Only when the page loads scrolled to the top
    AtTop,
    /// Only when the page loads scrolled away from the top
    Scrolled,
}

/// Shared side-effecting animation callback
pub type AnimationCallback = Arc<dyn Fn() + Send + Sync>;

/// A registered preloader animation
#[derive(Clone)]
pub struct AnimationSpec {
    pub callback: AnimationCallback,
    /// Declared play time; the preloader waits for the longest of these
    pub duration: Duration,
    /// Critical animations always play, even when registered after the
    /// load sequence already finished
    pub critical: bool,
    /// None means the animation fires regardless of scroll position
    pub only: Option<RunCondition>,
}

impl AnimationSpec {
    pub fn new(callback: impl Fn() + Send + Sync + 'static, duration: Duration) -> Self {
        Self {
            callback: Arc::new(callback),
            duration,
            critical: false,
            only: None,
        }
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }

    pub fn with_condition(mut self, only: RunCondition) -> Self {
        self.only = Some(only);
        self
    }

    /// Whether this animation fires for the given scroll position.
    pub fn eligible(&self, at_top: bool) -> bool {
        match self.only {
            None => true,
            Some(RunCondition::AtTop) => at_top,
            Some(RunCondition::Scrolled) => !at_top,
        }
    }
}

/// Handle returned on registration; unregisters the animation when passed
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationToken(u64);

/// Ordered store of registered preloader animations
pub struct AnimationRegistry {
    entries: Mutex<Vec<(AnimationToken, AnimationSpec)>>,
    next_id: AtomicU64,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn register(&self, spec: AnimationSpec) -> AnimationToken {
        let token = AnimationToken(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().unwrap().push((token, spec));
        token
    }

    /// Remove by token. Returns false if already removed.
    pub fn unregister(&self, token: AnimationToken) -> bool {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|(registered, _)| *registered != token);
        entries.len() != before
    }

    /// Snapshot of the animations eligible for this scroll position,
    /// in registration order.
    pub fn eligible(&self, at_top: bool) -> Vec<AnimationSpec> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, spec)| spec.eligible(at_top))
            .map(|(_, spec)| spec.clone())
            .collect()
    }

    /// True when nothing is registered or every animation declares zero
    /// duration (the load sequence has nothing to hold for).
    pub fn is_trivial(&self) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .all(|(_, spec)| spec.duration.is_zero())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl Default for AnimationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest declared duration in a set of animations.
pub fn longest_duration(specs: &[AnimationSpec]) -> Duration {
    specs
        .iter()
        .map(|spec| spec.duration)
        .max()
        .unwrap_or(Duration::ZERO)
}
