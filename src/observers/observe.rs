//! # Channel event observer trait.
//!
//! Provides [`Observe`], the extension point for plugging custom notification
//! handlers into the channel (logging, metrics, resubscription-on-reconnect).
//!
//! Each observer gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-observer bounded queue** (capacity via [`Observe::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported to stderr)
//!
//! ## Rules
//! - A slow observer only affects its own queue.
//! - Queue overflow drops the event **for this observer only**; others are
//!   unaffected.
//! - Events are processed sequentially (FIFO) per observer.
//! - Observers do not block publishers or each other.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use ridewire::{ChannelEvent, ChannelEventKind, Observe};
//!
//! struct Resubscriber;
//!
//! #[async_trait]
//! impl Observe for Resubscriber {
//!     async fn on_event(&self, ev: &ChannelEvent) {
//!         if ev.kind == ChannelEventKind::Reconnected {
//!             // re-register server-side subscriptions, resync state, ...
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "resubscriber" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::ChannelEvent;

/// Channel notification observer.
///
/// Each observer runs in isolation:
/// - **Bounded queue** buffers events (capacity via [`Self::queue_capacity`]).
/// - **Dedicated worker task** processes events sequentially (FIFO).
/// - **Panic isolation**: panics are caught and reported.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing affects only this observer's queue.
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, not in the publisher context.
    /// Events are delivered in FIFO order per observer.
    async fn on_event(&self, event: &ChannelEvent);

    /// Returns the observer name used in drop/panic reports.
    ///
    /// Prefer short, descriptive names (e.g., "metrics", "resubscriber").
    /// The default uses `type_name::<Self>()`, which can be verbose —
    /// override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this observer.
    ///
    /// On overflow the new event is dropped for this observer only; the
    /// runtime clamps capacity to a minimum of 1. Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
