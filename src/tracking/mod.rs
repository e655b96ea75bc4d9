// Crossfade promise tracking
// Must-finish-before-ready work (media loads, deferred mounts) registers
// here; the preloader and orchestrator wait for the set to settle.

mod tracker;

pub use tracker::PromiseTracker;
