// Crossfade event layer
//
// Typed publish/subscribe channels for sequencer lifecycle events. UI
// components subscribe to react to transitions starting and ending, the
// synthetic progress percentage, route swaps, and scroll shortcuts.

mod bus;

pub use bus::{Channel, EventBus, Payload, SubscriptionToken};
