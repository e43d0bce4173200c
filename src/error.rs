//! Error types used by the ridewire channel client.
//!
//! This module defines two main error enums:
//!
//! - [`TransportError`] — failures raised at the transport boundary.
//! - [`CodecError`] — per-message payload decode failures.
//!
//! Both types provide `as_label` for logging/metrics, and [`TransportError`]
//! additionally offers [`TransportError::is_retryable`].
//!
//! Nothing in this crate is allowed to escape as an unhandled fault: every
//! failure mode resolves to a dropped message, a boolean result, or a
//! diagnostic event on the bus.

use std::time::Duration;
use thiserror::Error;

/// # Errors raised at the transport boundary.
///
/// These represent failures of the underlying bidirectional channel: refused
/// connections, acknowledgment deadlines, or a transport that has shut down.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TransportError {
    /// The transport is not currently connected.
    #[error("transport is not connected")]
    NotConnected,

    /// Establishing the connection failed.
    #[error("connect failed: {reason}")]
    ConnectFailed {
        /// Human-readable failure description from the transport.
        reason: String,
    },

    /// No acknowledgment arrived within the deadline.
    #[error("acknowledgment timed out after {timeout:?}")]
    AckTimeout {
        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The transport has been closed and will deliver no further frames.
    #[error("transport closed")]
    Closed,
}

impl TransportError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use ridewire::TransportError;
    /// use std::time::Duration;
    ///
    /// let err = TransportError::AckTimeout { timeout: Duration::from_secs(3) };
    /// assert_eq!(err.as_label(), "transport_ack_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::NotConnected => "transport_not_connected",
            TransportError::ConnectFailed { .. } => "transport_connect_failed",
            TransportError::AckTimeout { .. } => "transport_ack_timeout",
            TransportError::Closed => "transport_closed",
        }
    }

    /// Indicates whether the failure is safe to retry.
    ///
    /// Returns `true` only for [`TransportError::AckTimeout`]: a missed
    /// acknowledgment may succeed on re-emission, while a closed or refused
    /// transport will not recover by retrying the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::AckTimeout { .. })
    }
}

/// # Per-message payload decode failures.
///
/// Raised by the codec when inbound wire arguments cannot be converted to the
/// requested typed record. Always recoverable: the single message is dropped
/// and processing of subsequent messages is unaffected.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CodecError {
    /// The inbound argument list was empty.
    #[error("payload is empty")]
    Empty,

    /// The first argument did not match the requested record's shape.
    #[error("payload shape mismatch: {0}")]
    Shape(#[from] serde_json::Error),
}

impl CodecError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CodecError::Empty => "codec_empty",
            CodecError::Shape(_) => "codec_shape",
        }
    }
}
