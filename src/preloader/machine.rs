// Crossfade Preloader State Machine
//
// Drives the initial page load: LOADING -> WAITING_FOR_ANIMATE ->
// ANIMATING -> DONE. Three readiness triggers race (ready-and-settled,
// progress threshold, maximum extra delay); whichever fires first wins and
// the others become no-ops behind an atomic guard. Loading never hangs:
// even a rejected document-ready signal completes the sequence.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::{interval, sleep, Instant};

use super::registry::{longest_duration, AnimationRegistry, AnimationSpec, AnimationToken};
use crate::config::SequencerConfig;
use crate::error::SequencerResult;
use crate::events::{Channel, EventBus, Payload};
use crate::host::ScrollEngine;
use crate::progress::ProgressEstimator;
use crate::scroll::scroll_to_anchor;
use crate::tracking::PromiseTracker;

/// Initial-load phase, monotonically non-decreasing per load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    WaitingForAnimate,
    Animating,
    Done,
}

/// The initial-load state machine
pub struct Preloader {
    config: SequencerConfig,
    bus: Arc<EventBus>,
    tracker: Arc<PromiseTracker>,
    registry: AnimationRegistry,
    phase_tx: watch::Sender<Phase>,
    /// Exactly-once guard for the loading-complete path
    finished_loading: AtomicBool,
}

impl Preloader {
    pub fn new(config: SequencerConfig, bus: Arc<EventBus>, tracker: Arc<PromiseTracker>) -> Self {
        let (phase_tx, _) = watch::channel(Phase::Loading);
        Self {
            config,
            bus,
            tracker,
            registry: AnimationRegistry::new(),
            phase_tx,
            finished_loading: AtomicBool::new(false),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase_tx.borrow()
    }

    /// Wait until the initial load sequence has fully finished.
    pub async fn wait_for_done(&self) {
        let mut phases = self.phase_tx.subscribe();
        loop {
            if *phases.borrow_and_update() == Phase::Done {
                return;
            }
            if phases.changed().await.is_err() {
                return;
            }
        }
    }

    /// Register an animation to play when the page becomes ready.
    ///
    /// Returns None once the animation set has started playing (phase
    /// Animating or Done): such a registration missed the batch, so a
    /// `critical` animation plays immediately instead (the UI must never
    /// get stuck mid-effect) and a non-critical one is dropped.
    pub fn register_animation(&self, spec: AnimationSpec) -> Option<AnimationToken> {
        if self.phase() >= Phase::Animating {
            if spec.critical {
                debug!("critical animation missed the batch; playing immediately");
                (spec.callback)();
            } else {
                debug!("animation missed the batch; dropped");
            }
            return None;
        }
        Some(self.registry.register(spec))
    }

    /// Remove a registered animation (component unmount).
    pub fn unregister_animation(&self, token: AnimationToken) -> bool {
        self.registry.unregister(token)
    }

    /// Drive the whole initial-load sequence. Runs once per instance.
    ///
    /// `document_ready` is the host's readiness signal; a rejection is
    /// treated as ready. `initial_anchor` is the fragment of the entry URL,
    /// if any.
    pub async fn run(
        self: &Arc<Self>,
        document_ready: impl Future<Output = SequencerResult<()>> + Send + 'static,
        scroll: Arc<dyn ScrollEngine>,
        initial_anchor: Option<String>,
    ) {
        if self.phase() != Phase::Loading || self.finished_loading.load(Ordering::SeqCst) {
            warn!("preloader already ran; ignoring second run");
            return;
        }
        scroll.pause();
        let started = Instant::now();

        let (ready_tx, ready_rx) = watch::channel(false);
        tokio::spawn(async move {
            if let Err(err) = document_ready.await {
                warn!("document-ready failed: {}; treating page as ready", err);
            }
            let _ = ready_tx.send(true);
        });

        // Per-frame progress poll; stops at the 99% threshold and hands
        // over to the completion race instead of stalling on estimation
        // error.
        let (threshold_tx, threshold_rx) = watch::channel(false);
        let poller = Arc::clone(self);
        tokio::spawn(async move {
            let mut estimator =
                ProgressEstimator::new(started, &poller.config.estimate_load_duration);
            let mut ticker = interval(poller.config.frame_period);
            loop {
                ticker.tick().await;
                if poller.phase() != Phase::Loading {
                    break;
                }
                let percent = estimator.percent_at(Instant::now());
                poller
                    .bus
                    .emit(Channel::ProgressUpdated, Payload::percent(percent));
                if estimator.is_nearly_complete() {
                    let _ = threshold_tx.send(true);
                    break;
                }
            }
        });

        let trigger = {
            let ready_and_settled = async {
                wait_for_flag(ready_rx.clone()).await;
                if let Err(err) = self
                    .tracker
                    .settle_all(self.config.settle_timeout, self.config.max_settle_rounds)
                    .await
                {
                    warn!("{}; proceeding as ready", err);
                }
                if !self.registry.is_trivial() {
                    // Animations with real durations: defer to the other triggers.
                    std::future::pending::<()>().await;
                }
                "ready with settled promises"
            };
            let progress_threshold = async {
                wait_for_flag(threshold_rx.clone()).await;
                wait_for_flag(ready_rx.clone()).await;
                "progress threshold"
            };
            let extra_delay_elapsed = async {
                wait_for_flag(ready_rx.clone()).await;
                sleep(self.config.max_extra_delay).await;
                "maximum extra delay"
            };
            tokio::select! {
                name = ready_and_settled => name,
                name = progress_threshold => name,
                name = extra_delay_elapsed => name,
            }
        };

        self.finish_loading(trigger, scroll.as_ref(), initial_anchor.as_deref())
            .await;
    }

    /// Completion path: WAITING_FOR_ANIMATE -> ANIMATING -> DONE.
    /// Idempotent; only the first caller per cycle does anything.
    async fn finish_loading(
        &self,
        trigger: &str,
        scroll: &dyn ScrollEngine,
        initial_anchor: Option<&str>,
    ) {
        if self.finished_loading.swap(true, Ordering::SeqCst) {
            debug!("load already completing; '{}' trigger ignored", trigger);
            return;
        }
        debug!("load ready ({})", trigger);

        self.set_phase(Phase::WaitingForAnimate);
        self.bus
            .emit(Channel::ProgressUpdated, Payload::percent(100.0));

        // Scroll placement decides which conditional animations fire.
        let at_top = match initial_anchor {
            Some(anchor) => {
                if let Err(err) = scroll_to_anchor(scroll, anchor, &self.config).await {
                    warn!("{}", err);
                }
                scroll.at_top()
            }
            None => {
                if self.config.reset_scroll_on_load {
                    scroll.scroll_to(0.0, false);
                }
                scroll.at_top()
            }
        };

        sleep(self.config.hold_delay).await;
        self.set_phase(Phase::Animating);

        let eligible = self.registry.eligible(at_top);
        let hold = longest_duration(&eligible);
        for spec in &eligible {
            (spec.callback)();
        }
        if !hold.is_zero() {
            sleep(hold + self.config.animation_buffer).await;
        }

        scroll.resume();
        scroll.refresh_layout();
        self.set_phase(Phase::Done);
        self.bus.emit(Channel::End, Payload::Empty);
    }

    /// Advance the phase; never moves backward.
    fn set_phase(&self, next: Phase) {
        self.phase_tx.send_if_modified(|phase| {
            if next > *phase {
                *phase = next;
                true
            } else {
                false
            }
        });
    }
}

async fn wait_for_flag(mut flag: watch::Receiver<bool>) {
    loop {
        if *flag.borrow_and_update() {
            return;
        }
        if flag.changed().await.is_err() {
            return;
        }
    }
}
