//! # Transport boundary: the underlying bidirectional realtime channel.
//!
//! The channel client consumes a [`Transport`] rather than owning a concrete
//! connection. This keeps the connection a process-wide singleton owned by
//! whoever constructs the [`Channel`](crate::Channel), and makes the boundary
//! swappable with a scripted double in tests.
//!
//! ## Delivery model
//! A transport exposes everything it receives as a stream of [`Frame`]s:
//! inbound messages tagged with an event key, and the four lifecycle signals
//! ([`LinkSignal`]). The stream is a broadcast receiver in the same shape as
//! the notification [`Bus`](crate::events::Bus); the channel's receive loop is
//! its single consumer in practice, which gives the serialized callback
//! stream the dispatch contract requires.
//!
//! ## Status
//! [`Transport::status`] must be cheap and callable from any context without
//! blocking. The transport's own status is authoritative; the channel is a
//! read-through cache of it.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::TransportError;

/// Connection status reported by the transport.
///
/// No two states are ever active at once; transitions happen only inside the
/// transport in response to its own lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// No connection and none being attempted.
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// The link is up.
    Connected,
    /// The transport is re-establishing a dropped link.
    Reconnecting,
}

/// Lifecycle signal raised by the transport about its own state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSignal {
    /// The link came up (initial connect or after a reconnect).
    Connect,
    /// The link went down.
    Disconnect,
    /// The transport started or completed an automatic reconnect cycle.
    Reconnect,
    /// The transport surfaced an error; status is unaffected.
    Error(String),
}

/// One unit of the transport's delivery stream.
#[derive(Debug, Clone)]
pub enum Frame {
    /// A lifecycle signal about the link itself.
    Signal(LinkSignal),
    /// An inbound message tagged with an event key.
    Message {
        /// Event key naming the logical channel this message belongs to.
        key: String,
        /// Ordered, loosely-typed wire arguments.
        args: Vec<Value>,
    },
}

/// # Bidirectional realtime channel abstraction.
///
/// Implementations serialize actual writes internally; `emit` and
/// `emit_with_ack` may be invoked from any execution context.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Initiates the connection. Implementations decide their own retry and
    /// reconnection policy; the channel client never reconnects on its own.
    async fn connect(&self) -> Result<(), TransportError>;

    /// Initiates a graceful disconnect.
    async fn disconnect(&self) -> Result<(), TransportError>;

    /// Returns the current link status. Must not block.
    fn status(&self) -> LinkStatus;

    /// Sends `args` tagged with `key`, fire-and-forget.
    async fn emit(&self, key: &str, args: Vec<Value>) -> Result<(), TransportError>;

    /// Sends `args` tagged with `key` and waits up to `timeout` for the
    /// correlated acknowledgment payload.
    ///
    /// # Errors
    /// [`TransportError::AckTimeout`] when no acknowledgment arrives within
    /// the deadline.
    async fn emit_with_ack(
        &self,
        key: &str,
        args: Vec<Value>,
        timeout: Duration,
    ) -> Result<Vec<Value>, TransportError>;

    /// Creates a new receiver over the transport's delivery stream.
    ///
    /// A receiver only observes frames delivered after it subscribes.
    fn frames(&self) -> broadcast::Receiver<Frame>;
}
