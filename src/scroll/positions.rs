// Crossfade scroll position cache
//
// Last known vertical offset per URL path, updated on every reported
// scroll, read when a back/forward navigation restores the viewport.

use std::collections::HashMap;
use std::sync::Mutex;

/// Maps URL path -> last known vertical scroll offset (last write wins)
pub struct ScrollPositions {
    offsets: Mutex<HashMap<String, f64>>,
}

impl ScrollPositions {
    pub fn new() -> Self {
        Self {
            offsets: Mutex::new(HashMap::new()),
        }
    }

    /// Record the current offset for a path.
    pub fn record(&self, path: &str, offset: f64) {
        self.offsets.lock().unwrap().insert(path.to_string(), offset);
    }

    /// Last known offset for a path, if any was recorded.
    pub fn lookup(&self, path: &str) -> Option<f64> {
        self.offsets.lock().unwrap().get(path).copied()
    }

    /// Drop the recorded offset for a path.
    pub fn forget(&self, path: &str) {
        self.offsets.lock().unwrap().remove(path);
    }
}

impl Default for ScrollPositions {
    fn default() -> Self {
        Self::new()
    }
}
