//! Operation events for external collaborators
//!
//! The sink is an optional channel sender injected at construction; there
//! is no global emitter. Sends are fire-and-forget: a dropped receiver is
//! ignored and never blocks or fails an operation.

use tokio::sync::mpsc::UnboundedSender;

/// Channel end the provider reports through, when one is configured.
pub type EventSink = UnboundedSender<Event>;

/// One event per provider operation, plus background fetch failures.
///
/// `is_draft` reports whether the affected path is in the draft set at the
/// time the event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Created {
        path: String,
        content: String,
        is_draft: bool,
    },
    Read {
        path: String,
        content: String,
        is_draft: bool,
    },
    Updated {
        path: String,
        content: String,
        is_draft: bool,
    },
    Deleted {
        path: String,
        is_draft: bool,
    },
    Listed {
        path: String,
        entries: usize,
    },
    Copied {
        source: String,
        dest: String,
        is_draft: bool,
    },
    Renamed {
        source: String,
        dest: String,
    },
    Published {
        commit_id: String,
    },
    Discarded,
    FetchFailed {
        error: String,
    },
}
