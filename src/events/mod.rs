//! Channel notifications: types and broadcast bus.
//!
//! This module groups the notification **data model** and the **bus** used to
//! publish/subscribe to events emitted by the channel client.
//!
//! ## Contents
//! - [`ChannelEventKind`], [`ChannelEvent`] — classification and metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the receive loop (lifecycle), the dispatch table
//!   (dropped messages), the emitter (ack attempts/exhaustion, skipped
//!   emissions).
//! - **Consumers**: application listeners and the observer fan-out
//!   (`ObserverSet`).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{ChannelEvent, ChannelEventKind};
