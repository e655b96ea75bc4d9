// Crossfade transitions
// Named enter/exit animation sets and the orchestrator that serializes
// inter-page navigations around them.

mod orchestrator;
mod registry;

pub use orchestrator::{NavigationOutcome, NavigationRequest, TransitionOrchestrator};
pub use registry::{
    longest_side_duration, TransitionAnimation, TransitionHandlers, TransitionRegistry,
    TransitionToken,
};
