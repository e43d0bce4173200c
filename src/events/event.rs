//! # Notifications emitted by the channel client.
//!
//! The [`ChannelEventKind`] enum classifies notifications across two groups:
//! - **Lifecycle**: transport state transitions (connected, disconnected,
//!   reconnected, errored)
//! - **Diagnostics**: dropped messages, acknowledgment outcomes, skipped
//!   emissions
//!
//! The [`ChannelEvent`] struct carries additional metadata such as the event
//! key, a human-readable reason, and the attempt counter.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! observed out of order.
//!
//! ## Example
//! ```rust
//! use ridewire::{ChannelEvent, ChannelEventKind};
//!
//! let ev = ChannelEvent::new(ChannelEventKind::MessageDropped)
//!     .with_key("nearby-workers")
//!     .with_reason("codec_shape");
//!
//! assert_eq!(ev.kind, ChannelEventKind::MessageDropped);
//! assert_eq!(ev.key.as_deref(), Some("nearby-workers"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of channel notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEventKind {
    // === Lifecycle ===
    /// Transport reported a successful connection.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Connected,

    /// Transport reported a disconnect. No automatic retry is initiated by
    /// the channel itself; reconnection policy belongs to the transport or
    /// the caller.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Disconnected,

    /// One-shot notification raised on the first `Connect` signal that
    /// follows a `Reconnect` signal. Fires exactly once per reconnect cycle
    /// and never on the initial connection; dependents use it to resubscribe
    /// or resynchronize state.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Reconnected,

    /// Transport surfaced an error. Diagnostic only: the transport's own
    /// status remains authoritative and this event does not change it.
    ///
    /// Sets:
    /// - `reason`: error description from the transport
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TransportErrored,

    // === Diagnostics ===
    /// An inbound message was dropped instead of dispatched (unusable or
    /// undecodable payload). The handler for that key was not invoked.
    ///
    /// Sets:
    /// - `key`: event key of the dropped message
    /// - `reason`: drop cause label (e.g. "codec_empty", "codec_shape")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    MessageDropped,

    /// One acknowledged-emission attempt is starting.
    ///
    /// Sets:
    /// - `key`: event key being emitted
    /// - `attempt`: attempt number (1-based)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AckAttempt,

    /// An acknowledged emission exhausted its retry budget and reported
    /// failure to the caller.
    ///
    /// Sets:
    /// - `key`: event key that went unacknowledged
    /// - `attempt`: total number of attempts performed
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AckExhausted,

    /// A guarded convenience emission was dropped because the link was not
    /// connected. Dropped, not queued: the action is never replayed.
    ///
    /// Sets:
    /// - `key`: event key of the skipped action
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    EmitSkipped,
}

/// Channel notification with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`ChannelEventKind`]
#[derive(Clone, Debug)]
pub struct ChannelEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: ChannelEventKind,

    /// Event key, if applicable.
    pub key: Option<Arc<str>>,
    /// Human-readable reason (errors, drop causes, etc.).
    pub reason: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
}

impl ChannelEvent {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: ChannelEventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            key: None,
            reason: None,
            attempt: None,
        }
    }

    /// Attaches an event key.
    #[inline]
    pub fn with_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// True for lifecycle kinds (connected/disconnected/reconnected/errored).
    #[inline]
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self.kind,
            ChannelEventKind::Connected
                | ChannelEventKind::Disconnected
                | ChannelEventKind::Reconnected
                | ChannelEventKind::TransportErrored
        )
    }
}
