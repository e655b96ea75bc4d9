// Crossfade ScrollEngine seam
//
// Abstraction over the host's smooth-scroll engine (locking, offsets,
// anchor queries, pin/scroll-trigger layout refresh). The anchor resolver
// deliberately never relies on a completion callback from this engine;
// it polls offsets until they stabilize.

/// Host-supplied scroll collaborator.
pub trait ScrollEngine: Send + Sync {
    /// Prevent user scrolling (during transitions).
    fn lock(&self);

    /// Re-enable user scrolling.
    fn unlock(&self);

    /// Pause the smooth-scroll engine (during the initial load).
    fn pause(&self);

    /// Resume the smooth-scroll engine.
    fn resume(&self);

    /// Current vertical scroll offset in pixels.
    fn scroll_offset(&self) -> f64;

    /// Scroll to a vertical offset, smoothly or instantly.
    fn scroll_to(&self, y: f64, smooth: bool);

    /// Document position of an anchor element, if it is rendered.
    fn anchor_position(&self, anchor: &str) -> Option<f64>;

    /// Per-element scroll offset (the `data-` attribute), if declared.
    fn anchor_offset(&self, anchor: &str) -> Option<f64>;

    /// Recompute pinned/scroll-triggered layout after a page swap.
    fn refresh_layout(&self);

    /// Whether the viewport is at (or within a pixel of) the top.
    fn at_top(&self) -> bool {
        self.scroll_offset().abs() < 1.0
    }
}
