//! # Channel client configuration.
//!
//! Provides [`Config`], the centralized settings for a [`Channel`](crate::Channel).
//!
//! ## Field semantics
//! - `ack_timeout`: per-attempt acknowledgment deadline for `emit_with_ack`
//! - `bus_capacity`: notification bus ring buffer size (min 1; clamped by Bus)
//!
//! Prefer the helper accessors over reading fields directly where clamping
//! applies.

use std::time::Duration;

/// Configuration for the channel client.
///
/// Defines:
/// - **Reliable emission**: acknowledgment deadline per attempt
/// - **Notification system**: bus capacity for event delivery
///
/// All fields are public for flexibility.
#[derive(Clone, Debug)]
pub struct Config {
    /// How long each `emit_with_ack` attempt waits for an acknowledgment
    /// before consuming a retry.
    ///
    /// Every attempt in a retry chain uses this same fixed deadline; there is
    /// no backoff growth between attempts.
    pub ack_timeout: Duration,

    /// Capacity of the notification bus broadcast ring buffer.
    ///
    /// Slow observers that lag behind more than `bus_capacity` events will
    /// receive `Lagged` and skip older items. Minimum value is 1 (enforced
    /// by the Bus).
    pub bus_capacity: usize,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    ///
    /// The `Bus` uses this value to avoid constructing an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `ack_timeout = 3s` (server acknowledgment deadline)
    /// - `bus_capacity = 1024` (good baseline)
    fn default() -> Self {
        Self {
            ack_timeout: Duration::from_secs(3),
            bus_capacity: 1024,
        }
    }
}
