// Crossfade mock hosts
//
// Mock implementations of the host seams for testing sequencer behavior
// without a DOM. Tests control responses, simulate slow page mounts and
// easing scrolls, and verify calls through counters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};
use url::Url;

use super::engine::ScrollEngine;
use super::router::Router;
use crate::error::{SequencerError, SequencerResult};

/// Mock router recording navigations and simulating mount latency.
pub struct MockRouter {
    /// Simulated time between the swap and the new page's ready signal
    navigate_delay: Mutex<Duration>,

    /// Whether `navigate()` should fail
    fail_navigation: AtomicBool,

    /// Every navigation with the instant it was dispatched
    navigations: Mutex<Vec<(String, Instant)>>,

    /// Fragments persisted via `replace_hash()`
    replaced_hashes: Mutex<Vec<String>>,

    /// External destinations opened
    external_opens: Mutex<Vec<String>>,

    /// Count of `cleanup_after_external()` invocations
    cleanup_count: AtomicUsize,
}

impl MockRouter {
    pub fn new() -> Self {
        Self {
            navigate_delay: Mutex::new(Duration::ZERO),
            fail_navigation: AtomicBool::new(false),
            navigations: Mutex::new(Vec::new()),
            replaced_hashes: Mutex::new(Vec::new()),
            external_opens: Mutex::new(Vec::new()),
            cleanup_count: AtomicUsize::new(0),
        }
    }

    /// Simulate a page that takes this long to mount and signal ready.
    pub fn set_navigate_delay(&self, delay: Duration) {
        *self.navigate_delay.lock().unwrap() = delay;
    }

    /// Make subsequent `navigate()` calls fail.
    pub fn set_fail_navigation(&self, fail: bool) {
        self.fail_navigation.store(fail, Ordering::Relaxed);
    }

    pub fn navigation_count(&self) -> usize {
        self.navigations.lock().unwrap().len()
    }

    /// Every navigation so far, with its dispatch instant.
    pub fn navigation_log(&self) -> Vec<(String, Instant)> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.navigations
            .lock()
            .unwrap()
            .last()
            .map(|(to, _)| to.clone())
    }

    pub fn replaced_hashes(&self) -> Vec<String> {
        self.replaced_hashes.lock().unwrap().clone()
    }

    pub fn external_opens(&self) -> Vec<String> {
        self.external_opens.lock().unwrap().clone()
    }

    pub fn cleanup_count(&self) -> usize {
        self.cleanup_count.load(Ordering::Relaxed)
    }
}

impl Default for MockRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Router for MockRouter {
    async fn navigate(&self, to: &Url) -> SequencerResult<()> {
        self.navigations
            .lock()
            .unwrap()
            .push((to.to_string(), Instant::now()));

        let delay = *self.navigate_delay.lock().unwrap();
        if !delay.is_zero() {
            sleep(delay).await;
        }

        if self.fail_navigation.load(Ordering::Relaxed) {
            return Err(SequencerError::Router(format!("mock refusing {}", to)));
        }
        Ok(())
    }

    fn replace_hash(&self, fragment: &str) {
        self.replaced_hashes
            .lock()
            .unwrap()
            .push(fragment.to_string());
    }

    fn open_external(&self, url: &Url) {
        self.external_opens.lock().unwrap().push(url.to_string());
    }

    fn cleanup_after_external(&self) {
        self.cleanup_count.fetch_add(1, Ordering::Relaxed);
    }
}

struct AnchorEntry {
    position: f64,
    offset: Option<f64>,
    /// Queries to answer "missing" before the element counts as rendered
    visible_after: u32,
    queries: u32,
}

/// Mock scroll engine with an easing viewport.
///
/// A smooth `scroll_to` sets a target; each `scroll_offset()` read moves
/// 20% of the remaining distance toward it, so deltas shrink every frame
/// the way a real easing curve settles.
pub struct MockScrollEngine {
    offset: Mutex<f64>,
    target: Mutex<Option<f64>>,
    anchors: Mutex<HashMap<String, AnchorEntry>>,
    scroll_commands: Mutex<Vec<(f64, bool)>>,
    locked: AtomicBool,
    paused: AtomicBool,
    lock_count: AtomicUsize,
    unlock_count: AtomicUsize,
    resume_count: AtomicUsize,
    refresh_count: AtomicUsize,
}

impl MockScrollEngine {
    pub fn new() -> Self {
        Self {
            offset: Mutex::new(0.0),
            target: Mutex::new(None),
            anchors: Mutex::new(HashMap::new()),
            scroll_commands: Mutex::new(Vec::new()),
            locked: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            lock_count: AtomicUsize::new(0),
            unlock_count: AtomicUsize::new(0),
            resume_count: AtomicUsize::new(0),
            refresh_count: AtomicUsize::new(0),
        }
    }

    /// Place the viewport without recording a scroll command.
    pub fn set_offset(&self, y: f64) {
        *self.offset.lock().unwrap() = y;
        *self.target.lock().unwrap() = None;
    }

    /// Render an anchor element at a document position.
    pub fn set_anchor(&self, anchor: &str, position: f64) {
        self.anchors.lock().unwrap().insert(
            anchor.to_string(),
            AnchorEntry {
                position,
                offset: None,
                visible_after: 0,
                queries: 0,
            },
        );
    }

    /// Render an anchor that only appears after N position queries
    /// (a late-mounting element).
    pub fn set_anchor_visible_after(&self, anchor: &str, position: f64, queries: u32) {
        self.anchors.lock().unwrap().insert(
            anchor.to_string(),
            AnchorEntry {
                position,
                offset: None,
                visible_after: queries,
                queries: 0,
            },
        );
    }

    /// Declare a per-element scroll offset (the data attribute).
    pub fn set_anchor_offset(&self, anchor: &str, offset: f64) {
        if let Some(entry) = self.anchors.lock().unwrap().get_mut(anchor) {
            entry.offset = Some(offset);
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn lock_count(&self) -> usize {
        self.lock_count.load(Ordering::Relaxed)
    }

    pub fn unlock_count(&self) -> usize {
        self.unlock_count.load(Ordering::Relaxed)
    }

    pub fn resume_count(&self) -> usize {
        self.resume_count.load(Ordering::Relaxed)
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count.load(Ordering::Relaxed)
    }

    /// Every scroll command issued, as (target, smooth) pairs.
    pub fn scroll_commands(&self) -> Vec<(f64, bool)> {
        self.scroll_commands.lock().unwrap().clone()
    }

    pub fn last_scroll_target(&self) -> Option<f64> {
        self.scroll_commands
            .lock()
            .unwrap()
            .last()
            .map(|(y, _)| *y)
    }
}

impl Default for MockScrollEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollEngine for MockScrollEngine {
    fn lock(&self) {
        self.locked.store(true, Ordering::Relaxed);
        self.lock_count.fetch_add(1, Ordering::Relaxed);
    }

    fn unlock(&self) {
        self.locked.store(false, Ordering::Relaxed);
        self.unlock_count.fetch_add(1, Ordering::Relaxed);
    }

    fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
        self.resume_count.fetch_add(1, Ordering::Relaxed);
    }

    fn scroll_offset(&self) -> f64 {
        let mut offset = self.offset.lock().unwrap();
        let mut target = self.target.lock().unwrap();
        if let Some(destination) = *target {
            let remaining = destination - *offset;
            if remaining.abs() < 0.5 {
                *offset = destination;
                *target = None;
            } else {
                *offset += remaining * 0.2;
            }
        }
        *offset
    }

    fn scroll_to(&self, y: f64, smooth: bool) {
        self.scroll_commands.lock().unwrap().push((y, smooth));
        if smooth {
            *self.target.lock().unwrap() = Some(y);
        } else {
            *self.offset.lock().unwrap() = y;
            *self.target.lock().unwrap() = None;
        }
    }

    fn anchor_position(&self, anchor: &str) -> Option<f64> {
        let mut anchors = self.anchors.lock().unwrap();
        let entry = anchors.get_mut(anchor)?;
        entry.queries += 1;
        if entry.queries > entry.visible_after {
            Some(entry.position)
        } else {
            None
        }
    }

    fn anchor_offset(&self, anchor: &str) -> Option<f64> {
        self.anchors
            .lock()
            .unwrap()
            .get(anchor)
            .and_then(|entry| entry.offset)
    }

    fn refresh_layout(&self) {
        self.refresh_count.fetch_add(1, Ordering::Relaxed);
    }
}
