// Crossfade scroll layer
// Anchor resolution by polled stabilization, plus the per-URL scroll
// position cache consulted on back/forward navigations.

mod anchor;
mod positions;

pub use anchor::{scroll_to_anchor, smooth_scroll_to};
pub use positions::ScrollPositions;
