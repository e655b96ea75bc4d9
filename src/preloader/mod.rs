// Crossfade preloader
// The one-time sequence gating the very first paint of a session:
// synthetic progress, readiness triggers, and the registered reveal
// animations.

mod machine;
mod registry;

pub use machine::{Phase, Preloader};
pub use registry::{
    longest_duration, AnimationCallback, AnimationRegistry, AnimationSpec, AnimationToken,
    RunCondition,
};
