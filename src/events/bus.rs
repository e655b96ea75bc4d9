// Crossfade Event Bus
//
// Dispatch is synchronous and in subscriber-registration order. A panicking
// subscriber is isolated so the remaining subscribers still run; the fault
// is logged, never fatal.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::warn;
use serde::{Deserialize, Serialize};

/// Lifecycle channels published by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// A transition (or the preloader sequence) began
    Start,
    /// A transition (or the initial load) completed
    End,
    /// The route swap was triggered
    RouteChange,
    /// A new synthetic progress percentage is available
    ProgressUpdated,
    /// A scroll-only shortcut ran instead of a route change
    Scroll,
}

/// Payload carried on every channel: a transition name, a percentage,
/// or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    Empty,
    Name { name: String },
    Percent { percent: f64 },
}

impl Payload {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name { name: name.into() }
    }

    pub fn percent(percent: f64) -> Self {
        Self::Percent { percent }
    }
}

type Handler = Arc<dyn Fn(&Payload) + Send + Sync>;

/// Handle returned by [`EventBus::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionToken {
    channel: Channel,
    id: u64,
}

/// Central publish/subscribe bus for sequencer lifecycle events
pub struct EventBus {
    /// Maps channel -> ordered subscriber list (registration order)
    subscribers: Mutex<HashMap<Channel, Vec<(u64, Handler)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to a channel.
    ///
    /// Returns a token for [`off`](Self::off). Handlers run synchronously on
    /// the emitting task, in the order they were registered.
    pub fn on(
        &self,
        channel: Channel,
        handler: impl Fn(&Payload) + Send + Sync + 'static,
    ) -> SubscriptionToken {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .unwrap()
            .entry(channel)
            .or_default()
            .push((id, Arc::new(handler)));
        SubscriptionToken { channel, id }
    }

    /// Remove a subscription. Returns false if the token was already removed.
    pub fn off(&self, token: SubscriptionToken) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap();
        match subscribers.get_mut(&token.channel) {
            Some(list) => {
                let before = list.len();
                list.retain(|(id, _)| *id != token.id);
                list.len() != before
            }
            None => false,
        }
    }

    /// Publish a payload to every subscriber of a channel.
    ///
    /// A subscriber that panics is logged and skipped; delivery continues
    /// with the next subscriber.
    pub fn emit(&self, channel: Channel, payload: Payload) {
        // Snapshot outside the lock so handlers may subscribe/unsubscribe.
        let handlers: Vec<Handler> = {
            let subscribers = self.subscribers.lock().unwrap();
            match subscribers.get(&channel) {
                Some(list) => list.iter().map(|(_, handler)| Arc::clone(handler)).collect(),
                None => return,
            }
        };

        for handler in handlers {
            let result = panic::catch_unwind(AssertUnwindSafe(|| handler(&payload)));
            if result.is_err() {
                warn!("subscriber on {:?} panicked; continuing delivery", channel);
            }
        }
    }

    /// Number of live subscriptions on a channel.
    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.subscribers
            .lock()
            .unwrap()
            .get(&channel)
            .map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
