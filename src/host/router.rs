// Crossfade Router seam
//
// The host application owns the actual route swap (framework router, history
// API, etc.). The sequencer only decides when to invoke it.

use async_trait::async_trait;
use url::Url;

use crate::error::SequencerResult;

/// Host-supplied routing collaborator.
///
/// `navigate` performs the page swap and resolves once the destination page
/// has mounted and signalled ready. The sequencer treats a failed navigation
/// as "proceed without the optional effect": it logs, releases the scroll
/// lock, and finishes the transition cycle.
#[async_trait]
pub trait Router: Send + Sync {
    /// Swap to the destination page; resolve when it is mounted and ready.
    async fn navigate(&self, to: &Url) -> SequencerResult<()>;

    /// Persist a new fragment on the current history entry without a swap
    /// (used by the same-page scroll shortcut).
    fn replace_hash(&self, fragment: &str);

    /// Open an external destination in a new browsing context.
    fn open_external(&self, url: &Url);

    /// Invoked after the external-navigation grace delay so any started
    /// animation context can be reverted if the visitor comes back.
    fn cleanup_after_external(&self) {}
}
