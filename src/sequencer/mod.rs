// Crossfade Sequencer facade
//
// One explicit instance owning the bus, the tracker, the preloader and the
// orchestrator, wired to host-supplied collaborators at construction. No
// process-wide state: independent instances (tests, embedded previews)
// cannot leak into each other.

use std::future::Future;
use std::sync::Arc;

use url::Url;

use crate::config::SequencerConfig;
use crate::error::SequencerResult;
use crate::events::{Channel, EventBus, Payload, SubscriptionToken};
use crate::host::{Router, ScrollEngine};
use crate::preloader::{AnimationSpec, AnimationToken, Phase, Preloader};
use crate::scroll::ScrollPositions;
use crate::tracking::PromiseTracker;
use crate::transitions::{
    NavigationOutcome, NavigationRequest, TransitionHandlers, TransitionOrchestrator,
    TransitionToken,
};

/// The page load & transition sequencer.
///
/// Construct one per browsing session with the host's router and scroll
/// engine, then drive it with [`start`](Self::start) once and
/// [`request_navigation`](Self::request_navigation) per link activation.
pub struct Sequencer {
    bus: Arc<EventBus>,
    tracker: Arc<PromiseTracker>,
    positions: Arc<ScrollPositions>,
    preloader: Arc<Preloader>,
    orchestrator: Arc<TransitionOrchestrator>,
    scroll: Arc<dyn ScrollEngine>,
}

impl Sequencer {
    pub fn new(
        config: SequencerConfig,
        router: Arc<dyn Router>,
        scroll: Arc<dyn ScrollEngine>,
        initial_url: &str,
    ) -> SequencerResult<Self> {
        let url = Url::parse(initial_url)?;
        let bus = Arc::new(EventBus::new());
        let tracker = Arc::new(PromiseTracker::new());
        let positions = Arc::new(ScrollPositions::new());
        let preloader = Arc::new(Preloader::new(
            config.clone(),
            Arc::clone(&bus),
            Arc::clone(&tracker),
        ));
        let orchestrator = Arc::new(TransitionOrchestrator::new(
            config,
            Arc::clone(&bus),
            Arc::clone(&tracker),
            router,
            Arc::clone(&scroll),
            Arc::clone(&positions),
            Arc::clone(&preloader),
            url,
        ));

        Ok(Self {
            bus,
            tracker,
            positions,
            preloader,
            orchestrator,
            scroll,
        })
    }

    /// Drive the initial load sequence to completion.
    ///
    /// `document_ready` is the host's readiness signal; rejection is treated
    /// as ready. The entry URL's fragment, if any, is resolved as the
    /// initial scroll anchor.
    pub async fn start(
        &self,
        document_ready: impl Future<Output = SequencerResult<()>> + Send + 'static,
    ) {
        let anchor = self
            .orchestrator
            .current_url()
            .fragment()
            .map(str::to_string);
        self.preloader
            .run(document_ready, Arc::clone(&self.scroll), anchor)
            .await;
    }

    /// Current initial-load phase.
    pub fn phase(&self) -> Phase {
        self.preloader.phase()
    }

    /// Register an animation to play when the page first becomes ready.
    ///
    /// Returns None after the load finished (a critical animation plays
    /// immediately in that case).
    pub fn register_preloader_animation(&self, spec: AnimationSpec) -> Option<AnimationToken> {
        self.preloader.register_animation(spec)
    }

    pub fn unregister_preloader_animation(&self, token: AnimationToken) -> bool {
        self.preloader.unregister_animation(token)
    }

    /// Contribute enter/exit handlers to a named page transition.
    pub fn register_page_transition(
        &self,
        name: &str,
        handlers: TransitionHandlers,
    ) -> TransitionToken {
        self.orchestrator.registry().register(name, handlers)
    }

    pub fn unregister_page_transition(&self, token: TransitionToken) -> bool {
        self.orchestrator.registry().unregister(token)
    }

    /// Handle a navigation request from a link or button component.
    pub async fn request_navigation(
        &self,
        request: NavigationRequest,
    ) -> SequencerResult<NavigationOutcome> {
        self.orchestrator.request_navigation(request).await
    }

    /// Register async work that must settle before the page counts as ready.
    pub fn track_promise(&self, future: impl Future<Output = ()> + Send + 'static) {
        self.tracker.track(future);
    }

    /// Record the viewport offset for the current page (fed by the host's
    /// scroll listener; consulted on back/forward navigations).
    pub fn note_scroll_position(&self, offset: f64) {
        let path = self.orchestrator.current_url().path().to_string();
        self.positions.record(&path, offset);
    }

    /// Subscribe to a lifecycle channel.
    pub fn on(
        &self,
        channel: Channel,
        handler: impl Fn(&Payload) + Send + Sync + 'static,
    ) -> SubscriptionToken {
        self.bus.on(channel, handler)
    }

    /// Remove a lifecycle subscription.
    pub fn off(&self, token: SubscriptionToken) -> bool {
        self.bus.off(token)
    }
}

#[cfg(test)]
#[path = "unit/scenario_tests.rs"]
mod scenario_tests;
