// Crossfade Transition Orchestrator
//
// Serializes inter-page navigations: at most one transition runs at a time,
// at most one navigation waits in the pending slot (last write wins), and a
// request for the destination already in flight is a duplicate click and is
// dropped. The full sequence is exit set -> route swap -> promise
// settlement -> scroll restoration -> enter set, with the scroll engine
// locked throughout.

use std::sync::{Arc, Mutex};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use url::Url;

use super::registry::{longest_side_duration, TransitionRegistry};
use crate::config::SequencerConfig;
use crate::error::SequencerResult;
use crate::events::{Channel, EventBus, Payload};
use crate::host::{Router, ScrollEngine};
use crate::preloader::Preloader;
use crate::scroll::{scroll_to_anchor, smooth_scroll_to, ScrollPositions};
use crate::tracking::PromiseTracker;

/// A navigation asked for by a link or button component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    /// Destination URL, absolute or relative to the current page
    pub to: String,
    /// Named transition to run; None or "instant" swaps without animation
    pub transition: Option<String>,
    /// Restore the cached scroll offset (back/forward navigation)
    #[serde(default)]
    pub restore_scroll: bool,
}

impl NavigationRequest {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            transition: None,
            restore_scroll: false,
        }
    }

    pub fn with_transition(mut self, name: impl Into<String>) -> Self {
        self.transition = Some(name.into());
        self
    }

    pub fn with_restore_scroll(mut self, restore: bool) -> Self {
        self.restore_scroll = restore;
        self
    }
}

/// How a navigation request was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A full animated transition ran
    Started,
    /// Another transition was in flight; this one waits in the pending slot
    Queued,
    /// Duplicate of the in-flight destination; dropped
    Ignored,
    /// Same page: scrolled to the anchor or top, no route change
    ScrollOnly,
    /// Swapped without animations (absent, "instant", or unregistered name)
    Instant,
    /// External origin: opened in a new browsing context
    External,
}

/// Serialized driver for inter-page navigation transitions
pub struct TransitionOrchestrator {
    config: SequencerConfig,
    bus: Arc<EventBus>,
    tracker: Arc<PromiseTracker>,
    registry: TransitionRegistry,
    router: Arc<dyn Router>,
    scroll: Arc<dyn ScrollEngine>,
    positions: Arc<ScrollPositions>,
    preloader: Arc<Preloader>,
    /// The navigation currently being transitioned, if any
    current: Mutex<Option<NavigationRequest>>,
    /// The single queued navigation (last write wins)
    pending: Mutex<Option<NavigationRequest>>,
    current_url: Mutex<Url>,
}

impl TransitionOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: SequencerConfig,
        bus: Arc<EventBus>,
        tracker: Arc<PromiseTracker>,
        router: Arc<dyn Router>,
        scroll: Arc<dyn ScrollEngine>,
        positions: Arc<ScrollPositions>,
        preloader: Arc<Preloader>,
        initial_url: Url,
    ) -> Self {
        Self {
            config,
            bus,
            tracker,
            registry: TransitionRegistry::new(),
            router,
            scroll,
            positions,
            preloader,
            current: Mutex::new(None),
            pending: Mutex::new(None),
            current_url: Mutex::new(initial_url),
        }
    }

    pub fn registry(&self) -> &TransitionRegistry {
        &self.registry
    }

    pub fn current_url(&self) -> Url {
        self.current_url.lock().unwrap().clone()
    }

    /// Handle a navigation request from a link or button component.
    ///
    /// Returns how the request was handled; see [`NavigationOutcome`]. Only
    /// parse failures surface as errors, every runtime failure degrades to
    /// a logged, lock-releasing fallback.
    pub async fn request_navigation(
        &self,
        request: NavigationRequest,
    ) -> SequencerResult<NavigationOutcome> {
        let destination = self.resolve(&request.to)?;

        // External destinations bypass the sequencing entirely.
        if destination.origin() != self.current_url.lock().unwrap().origin() {
            debug!("external destination '{}'", destination);
            self.router.open_external(&destination);
            sleep(self.config.external_cleanup_delay).await;
            self.router.cleanup_after_external();
            return Ok(NavigationOutcome::External);
        }

        // Claim the active slot or coalesce into the pending one.
        {
            let mut current = self.current.lock().unwrap();
            if let Some(active) = current.as_ref() {
                if active.to == request.to {
                    debug!("duplicate navigation to '{}' dropped", request.to);
                    return Ok(NavigationOutcome::Ignored);
                }
                debug!("navigation in flight; queueing '{}'", request.to);
                *self.pending.lock().unwrap() = Some(request);
                return Ok(NavigationOutcome::Queued);
            }
            *current = Some(request.clone());
        }

        let outcome = self.run_one(&request).await;

        // Drain the pending slot serially; tail loop, never reentrant.
        loop {
            let next = self.pending.lock().unwrap().take();
            match next {
                Some(next_request) => {
                    debug!("starting queued navigation to '{}'", next_request.to);
                    *self.current.lock().unwrap() = Some(next_request.clone());
                    self.run_one(&next_request).await;
                }
                None => {
                    *self.current.lock().unwrap() = None;
                    break;
                }
            }
        }

        Ok(outcome)
    }

    async fn run_one(&self, request: &NavigationRequest) -> NavigationOutcome {
        let destination = match self.resolve(&request.to) {
            Ok(url) => url,
            Err(err) => {
                warn!("dropping unparseable destination '{}': {}", request.to, err);
                return NavigationOutcome::Ignored;
            }
        };

        let current_url = self.current_url.lock().unwrap().clone();
        if destination.path() == current_url.path() {
            return self.scroll_only(&destination).await;
        }

        let named = request
            .transition
            .as_deref()
            .filter(|name| *name != "instant" && self.registry.contains(name));

        match named {
            Some(name) => self.animated_swap(request, &destination, name).await,
            None => self.instant_swap(request, &destination).await,
        }
    }

    /// Same-page shortcut: no swap, no transition animations, just scroll.
    async fn scroll_only(&self, destination: &Url) -> NavigationOutcome {
        let fragment = destination.fragment().map(str::to_string);
        if let Some(anchor) = fragment.as_deref() {
            self.router.replace_hash(anchor);
        }
        self.bus.emit(
            Channel::Scroll,
            fragment
                .as_deref()
                .map_or(Payload::Empty, Payload::name),
        );

        match fragment.as_deref() {
            Some(anchor) => {
                if let Err(err) = scroll_to_anchor(self.scroll.as_ref(), anchor, &self.config).await
                {
                    warn!("{}", err);
                }
            }
            None => smooth_scroll_to(self.scroll.as_ref(), 0.0, &self.config).await,
        }

        self.scroll.unlock();
        *self.current_url.lock().unwrap() = destination.clone();
        NavigationOutcome::ScrollOnly
    }

    /// Swap without animation sets (absent, "instant", or unregistered name).
    async fn instant_swap(
        &self,
        request: &NavigationRequest,
        destination: &Url,
    ) -> NavigationOutcome {
        self.scroll.lock();
        if let Err(err) = self.router.navigate(destination).await {
            warn!("navigation to '{}' failed: {}", destination, err);
            self.scroll.unlock();
            return NavigationOutcome::Ignored;
        }
        self.bus.emit(Channel::RouteChange, Payload::Empty);
        *self.current_url.lock().unwrap() = destination.clone();

        self.restore_scroll(request, destination).await;
        self.scroll.unlock();
        NavigationOutcome::Instant
    }

    /// The full animated sequence.
    async fn animated_swap(
        &self,
        request: &NavigationRequest,
        destination: &Url,
        name: &str,
    ) -> NavigationOutcome {
        // Never start a page transition while the initial load animation
        // is still playing.
        self.preloader.wait_for_done().await;

        self.scroll.lock();
        self.bus.emit(Channel::Start, Payload::name(name));

        let exits = self.registry.exit_set(name);
        for animation in &exits {
            (animation.callback)();
        }
        let exit_hold = longest_side_duration(&exits);
        if !exit_hold.is_zero() {
            sleep(exit_hold).await;
        }

        if let Err(err) = self.router.navigate(destination).await {
            warn!("navigation to '{}' failed: {}", destination, err);
            self.scroll.unlock();
            self.bus.emit(Channel::End, Payload::name(name));
            return NavigationOutcome::Ignored;
        }
        self.bus.emit(Channel::RouteChange, Payload::name(name));
        *self.current_url.lock().unwrap() = destination.clone();

        // The destination page may have tracked new media loads on mount.
        if let Err(err) = self
            .tracker
            .settle_all(self.config.settle_timeout, self.config.max_settle_rounds)
            .await
        {
            warn!("{}; continuing the transition", err);
        }
        self.restore_scroll(request, destination).await;

        let enters = self.registry.enter_set(name);
        for animation in &enters {
            (animation.callback)();
        }
        let enter_hold = longest_side_duration(&enters);
        if !enter_hold.is_zero() {
            sleep(enter_hold).await;
        }

        self.scroll.unlock();
        self.scroll.refresh_layout();
        self.bus.emit(Channel::End, Payload::name(name));
        NavigationOutcome::Started
    }

    /// Anchor beats cached offset beats top.
    async fn restore_scroll(&self, request: &NavigationRequest, destination: &Url) {
        if let Some(anchor) = destination.fragment() {
            if let Err(err) = scroll_to_anchor(self.scroll.as_ref(), anchor, &self.config).await {
                warn!("{}", err);
            }
            return;
        }
        if request.restore_scroll {
            if let Some(offset) = self.positions.lookup(destination.path()) {
                self.scroll.scroll_to(offset, false);
                return;
            }
        }
        self.scroll.scroll_to(0.0, false);
    }

    fn resolve(&self, to: &str) -> SequencerResult<Url> {
        let base = self.current_url.lock().unwrap().clone();
        Ok(base.join(to)?)
    }
}
