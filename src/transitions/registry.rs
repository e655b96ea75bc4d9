// Crossfade transition registry
//
// Named enter/exit animation sets run around page navigations. Several UI
// components may contribute handlers to the same name; contributions merge
// in registration order and are removed by token on unmount.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::preloader::AnimationCallback;

/// One side (enter or exit) of a transition contribution
#[derive(Clone)]
pub struct TransitionAnimation {
    pub callback: AnimationCallback,
    pub duration: Duration,
}

impl TransitionAnimation {
    pub fn new(callback: impl Fn() + Send + Sync + 'static, duration: Duration) -> Self {
        Self {
            callback: std::sync::Arc::new(callback),
            duration,
        }
    }
}

/// A single caller's contribution to a named transition
#[derive(Clone)]
pub struct TransitionHandlers {
    /// Runs on the destination page after the swap
    pub enter: TransitionAnimation,
    /// Runs on the departing page before the swap
    pub exit: TransitionAnimation,
}

/// Handle returned on registration; removes the contribution when passed
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionToken(u64);

/// Mapping from transition name to its merged enter/exit sets
pub struct TransitionRegistry {
    transitions: Mutex<HashMap<String, Vec<(TransitionToken, TransitionHandlers)>>>,
    next_id: AtomicU64,
}

impl TransitionRegistry {
    pub fn new() -> Self {
        Self {
            transitions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Contribute handlers to a named transition. Contributions from
    /// different callers merge.
    pub fn register(&self, name: &str, handlers: TransitionHandlers) -> TransitionToken {
        let token = TransitionToken(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.transitions
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push((token, handlers));
        token
    }

    /// Remove a contribution by token. Returns false if already removed.
    pub fn unregister(&self, token: TransitionToken) -> bool {
        let mut transitions = self.transitions.lock().unwrap();
        for list in transitions.values_mut() {
            let before = list.len();
            list.retain(|(registered, _)| *registered != token);
            if list.len() != before {
                return true;
            }
        }
        false
    }

    /// Whether any contribution exists for this name.
    pub fn contains(&self, name: &str) -> bool {
        self.transitions
            .lock()
            .unwrap()
            .get(name)
            .is_some_and(|list| !list.is_empty())
    }

    /// The merged exit set for a name, in registration order.
    pub fn exit_set(&self, name: &str) -> Vec<TransitionAnimation> {
        self.side(name, |handlers| handlers.exit.clone())
    }

    /// The merged enter set for a name, in registration order.
    pub fn enter_set(&self, name: &str) -> Vec<TransitionAnimation> {
        self.side(name, |handlers| handlers.enter.clone())
    }

    fn side(
        &self,
        name: &str,
        pick: impl Fn(&TransitionHandlers) -> TransitionAnimation,
    ) -> Vec<TransitionAnimation> {
        self.transitions
            .lock()
            .unwrap()
            .get(name)
            .map(|list| list.iter().map(|(_, handlers)| pick(handlers)).collect())
            .unwrap_or_default()
    }
}

impl Default for TransitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Longest declared duration in one side of a transition.
pub fn longest_side_duration(animations: &[TransitionAnimation]) -> Duration {
    animations
        .iter()
        .map(|animation| animation.duration)
        .max()
        .unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handlers(enter_ms: u64, exit_ms: u64) -> TransitionHandlers {
        TransitionHandlers {
            enter: TransitionAnimation::new(|| {}, Duration::from_millis(enter_ms)),
            exit: TransitionAnimation::new(|| {}, Duration::from_millis(exit_ms)),
        }
    }

    #[test]
    fn test_contributions_merge_for_the_same_name() {
        let registry = TransitionRegistry::new();
        registry.register("fade", handlers(300, 300));
        registry.register("fade", handlers(500, 500));

        assert!(registry.contains("fade"));
        assert_eq!(registry.exit_set("fade").len(), 2);
        assert_eq!(registry.enter_set("fade").len(), 2);
        assert_eq!(
            longest_side_duration(&registry.exit_set("fade")),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_unregister_removes_only_that_contribution() {
        let registry = TransitionRegistry::new();
        let first = registry.register("wipe", handlers(100, 100));
        registry.register("wipe", handlers(200, 200));

        assert!(registry.unregister(first));
        assert!(!registry.unregister(first));
        assert_eq!(registry.exit_set("wipe").len(), 1);
        assert!(registry.contains("wipe"));
    }

    #[test]
    fn test_name_without_contributions_is_unregistered() {
        let registry = TransitionRegistry::new();
        let token = registry.register("fade", handlers(100, 100));
        registry.unregister(token);

        assert!(!registry.contains("fade"));
        assert!(registry.exit_set("fade").is_empty());
        assert!(!registry.contains("slide"));
    }
}
