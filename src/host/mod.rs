// Crossfade host layer
//
// The sequencer orchestrates collaborators it does not implement: the
// routing layer that performs the actual page swap and the smooth-scroll
// engine that owns the viewport. Both sit behind traits here so the core
// stays testable without a DOM. Mock implementations live in `mock` and
// are exported for embedding applications to test against too.

mod engine;
mod mock;
mod router;

pub use engine::ScrollEngine;
pub use mock::{MockRouter, MockScrollEngine};
pub use router::Router;
