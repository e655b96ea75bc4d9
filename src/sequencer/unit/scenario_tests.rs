// End-to-end scenarios driven through the public Sequencer API:
// full load timing, exit-set holds, same-page shortcuts, and the
// load-before-transition ordering guarantee.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::config::SequencerConfig;
use crate::error::SequencerResult;
use crate::events::{Channel, Payload};
use crate::host::{MockRouter, MockScrollEngine, Router, ScrollEngine};
use crate::preloader::{AnimationSpec, Phase};
use crate::transitions::{
    NavigationOutcome, NavigationRequest, TransitionAnimation, TransitionHandlers,
};

use super::Sequencer;

struct Harness {
    sequencer: Arc<Sequencer>,
    router: Arc<MockRouter>,
    engine: Arc<MockScrollEngine>,
}

fn harness(config: SequencerConfig, initial_url: &str) -> Harness {
    let router = Arc::new(MockRouter::new());
    let engine = Arc::new(MockScrollEngine::new());
    let sequencer = Arc::new(
        Sequencer::new(
            config,
            Arc::clone(&router) as Arc<dyn Router>,
            Arc::clone(&engine) as Arc<dyn ScrollEngine>,
            initial_url,
        )
        .unwrap(),
    );
    Harness {
        sequencer,
        router,
        engine,
    }
}

async fn ready_after(delay: Duration) -> SequencerResult<()> {
    sleep(delay).await;
    Ok(())
}

fn fade_contribution(enter_ms: u64, exit_ms: u64) -> TransitionHandlers {
    TransitionHandlers {
        enter: TransitionAnimation::new(|| {}, Duration::from_millis(enter_ms)),
        exit: TransitionAnimation::new(|| {}, Duration::from_millis(exit_ms)),
    }
}

#[tokio::test(start_paused = true)]
async fn test_full_load_finishes_well_under_two_seconds() {
    let config = SequencerConfig::default().with_estimator(|_| Duration::from_millis(1000));
    let hx = harness(config, "https://studio.example/");

    let percents = Arc::new(Mutex::new(Vec::new()));
    let percents_clone = Arc::clone(&percents);
    hx.sequencer.on(Channel::ProgressUpdated, move |payload| {
        if let Payload::Percent { percent } = payload {
            percents_clone.lock().unwrap().push(*percent);
        }
    });

    let before = Instant::now();
    hx.sequencer
        .start(ready_after(Duration::from_millis(600)))
        .await;

    assert_eq!(hx.sequencer.phase(), Phase::Done);
    assert!(before.elapsed() < Duration::from_secs(2));

    // Percent climbs strictly toward 100 before completion.
    let observed = percents.lock().unwrap().clone();
    assert!(observed.len() > 5);
    assert!(observed.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(*observed.last().unwrap(), 100.0);
}

#[tokio::test(start_paused = true)]
async fn test_fade_exit_set_holds_exactly_half_a_second() {
    let config = SequencerConfig::default().with_estimator(|_| Duration::from_millis(1));
    let hx = harness(config, "https://studio.example/");
    hx.sequencer.start(async { Ok(()) }).await;

    hx.sequencer
        .register_page_transition("fade", fade_contribution(300, 300));
    hx.sequencer
        .register_page_transition("fade", fade_contribution(500, 500));

    let started_at = Arc::new(Mutex::new(None::<Instant>));
    let started_clone = Arc::clone(&started_at);
    hx.sequencer.on(Channel::Start, move |_| {
        *started_clone.lock().unwrap() = Some(Instant::now());
    });

    let outcome = hx
        .sequencer
        .request_navigation(NavigationRequest::new("/work").with_transition("fade"))
        .await
        .unwrap();
    assert_eq!(outcome, NavigationOutcome::Started);

    let start = started_at.lock().unwrap().expect("start event fired");
    let (_, swapped_at) = hx.router.navigation_log()[0];
    assert_eq!(swapped_at - start, Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_same_page_anchor_emits_scroll_only_and_unlocks() {
    let config = SequencerConfig::default().with_estimator(|_| Duration::from_millis(1));
    let hx = harness(config, "https://studio.example/pricing");
    hx.engine.set_anchor("plans", 1200.0);
    hx.sequencer.start(async { Ok(()) }).await;

    let route_changes = Arc::new(AtomicUsize::new(0));
    let scrolls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&route_changes);
    hx.sequencer.on(Channel::RouteChange, move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });
    let counter = Arc::clone(&scrolls);
    hx.sequencer.on(Channel::Scroll, move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let outcome = hx
        .sequencer
        .request_navigation(NavigationRequest::new("/pricing#plans"))
        .await
        .unwrap();

    assert_eq!(outcome, NavigationOutcome::ScrollOnly);
    assert_eq!(route_changes.load(Ordering::Relaxed), 0);
    assert_eq!(scrolls.load(Ordering::Relaxed), 1);
    assert_eq!(hx.router.navigation_count(), 0);
    assert!(!hx.engine.is_locked());
}

#[tokio::test(start_paused = true)]
async fn test_transition_never_starts_before_initial_load_finishes() {
    let config = SequencerConfig::default().with_estimator(|_| Duration::from_secs(30));
    let hx = harness(config, "https://studio.example/");

    // A real reveal animation keeps the load busy past the ready signal.
    hx.sequencer.register_preloader_animation(AnimationSpec::new(
        || {},
        Duration::from_millis(200),
    ));
    hx.sequencer
        .register_page_transition("fade", fade_contribution(100, 100));

    let load_ended_at = Arc::new(Mutex::new(None::<Instant>));
    let transition_started_at = Arc::new(Mutex::new(None::<Instant>));
    let ended_clone = Arc::clone(&load_ended_at);
    hx.sequencer.on(Channel::End, move |_| {
        let mut ended = ended_clone.lock().unwrap();
        if ended.is_none() {
            *ended = Some(Instant::now());
        }
    });
    let started_clone = Arc::clone(&transition_started_at);
    hx.sequencer.on(Channel::Start, move |_| {
        *started_clone.lock().unwrap() = Some(Instant::now());
    });

    let loader = Arc::clone(&hx.sequencer);
    let load = tokio::spawn(async move {
        loader.start(ready_after(Duration::from_millis(300))).await;
    });
    tokio::task::yield_now().await;

    // Requested while still loading; must wait for Done.
    let navigator = Arc::clone(&hx.sequencer);
    let navigation = tokio::spawn(async move {
        navigator
            .request_navigation(NavigationRequest::new("/work").with_transition("fade"))
            .await
            .unwrap()
    });

    load.await.unwrap();
    assert_eq!(navigation.await.unwrap(), NavigationOutcome::Started);

    let ended = load_ended_at.lock().unwrap().expect("load end fired");
    let started = transition_started_at.lock().unwrap().expect("transition started");
    assert!(started >= ended);
    assert_eq!(hx.router.navigation_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_tracked_promise_gates_readiness() {
    let config = SequencerConfig::default().with_estimator(|_| Duration::from_secs(30));
    let hx = harness(config, "https://studio.example/");

    hx.sequencer
        .track_promise(sleep(Duration::from_millis(400)));

    let before = Instant::now();
    hx.sequencer.start(async { Ok(()) }).await;

    assert_eq!(hx.sequencer.phase(), Phase::Done);
    // Ready only after the tracked media load settled, plus the hold.
    assert!(before.elapsed() >= Duration::from_millis(650));
    assert!(before.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_off_stops_event_delivery() {
    let config = SequencerConfig::default().with_estimator(|_| Duration::from_millis(1));
    let hx = harness(config, "https://studio.example/");

    let hits = Arc::new(AtomicUsize::new(0));
    let hits_clone = Arc::clone(&hits);
    let token = hx.sequencer.on(Channel::End, move |_| {
        hits_clone.fetch_add(1, Ordering::Relaxed);
    });
    assert!(hx.sequencer.off(token));

    hx.sequencer.start(async { Ok(()) }).await;
    assert_eq!(hx.sequencer.phase(), Phase::Done);
    assert_eq!(hits.load(Ordering::Relaxed), 0);
}

#[tokio::test(start_paused = true)]
async fn test_scroll_positions_round_trip_through_navigation() {
    let config = SequencerConfig::default().with_estimator(|_| Duration::from_millis(1));
    let hx = harness(config, "https://studio.example/work");
    hx.sequencer.start(async { Ok(()) }).await;

    // Visitor scrolled /work, left, and navigated back.
    hx.sequencer.note_scroll_position(640.0);
    hx.sequencer
        .request_navigation(NavigationRequest::new("/about"))
        .await
        .unwrap();
    hx.sequencer
        .request_navigation(NavigationRequest::new("/work").with_restore_scroll(true))
        .await
        .unwrap();

    assert_eq!(hx.engine.last_scroll_target(), Some(640.0));
}
