//! Crossfade: page load & transition sequencing for animated sites.
//!
//! The crate drives two lifecycles around a host-supplied router and
//! smooth-scroll engine:
//!
//! - the **preloader**: initial-load readiness, a synthetic progress
//!   percentage, and the registered reveal animations, run exactly once
//!   per session;
//! - **page transitions**: serialized exit -> swap -> enter sequences
//!   around navigations, with a single pending slot for requests that
//!   arrive mid-transition.
//!
//! Everything is cooperative and event-driven; the only polling loops are
//! the deliberate per-frame progress and scroll-stabilization ticks. All
//! failure paths degrade to "proceed without the optional effect" so the
//! page always becomes interactive.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use crossfade::{
//!     MockRouter, MockScrollEngine, NavigationRequest, Sequencer, SequencerConfig,
//! };
//!
//! # async fn example() -> crossfade::SequencerResult<()> {
//! let config = SequencerConfig::default()
//!     .with_estimator(|_| Duration::from_millis(1500));
//! let sequencer = Sequencer::new(
//!     config,
//!     Arc::new(MockRouter::new()),
//!     Arc::new(MockScrollEngine::new()),
//!     "https://studio.example/",
//! )?;
//!
//! sequencer.start(async { Ok(()) }).await;
//! sequencer
//!     .request_navigation(NavigationRequest::new("/work").with_transition("fade"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod preloader;
pub mod progress;
pub mod scroll;
pub mod sequencer;
pub mod tracking;
pub mod transitions;

pub use config::{LoadEstimator, SequencerConfig};
pub use error::{SequencerError, SequencerResult};
pub use events::{Channel, EventBus, Payload, SubscriptionToken};
pub use host::{MockRouter, MockScrollEngine, Router, ScrollEngine};
pub use preloader::{AnimationSpec, AnimationToken, Phase, Preloader, RunCondition};
pub use sequencer::Sequencer;
pub use tracking::PromiseTracker;
pub use transitions::{
    NavigationOutcome, NavigationRequest, TransitionAnimation, TransitionHandlers,
    TransitionToken,
};
