//! # ridewire
//!
//! **Ridewire** is a realtime event channel client for Rust: connection
//! supervision, event subscription/dispatch, and acknowledgment-based
//! reliable emission over a persistent bidirectional transport.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!       ┌─────────────────┐      ┌─────────────────┐
//!       │ application     │      │ application     │
//!       │ handlers (raw)  │      │ handlers (typed)│
//!       └────────▲────────┘      └────────▲────────┘
//!                │    decoded payloads    │
//! ┌──────────────┴────────────────────────┴──────────────────────────┐
//! │  Channel (connection supervisor)                                 │
//! │  - DispatchTable (key → ordered handlers)                        │
//! │  - Emitter (fire-and-forget + bounded-retry acked emission)      │
//! │  - Bus (broadcast notifications)                                 │
//! │  - receive loop (serialized frame delivery)                      │
//! └───────▲──────────────────────┬───────────────────────────┬───────┘
//!         │ Frame::Message       │ emit / emit_with_ack      │
//!         │ Frame::Signal        ▼                           ▼
//! ┌───────┴──────────────────────────────────┐   ┌──────────────────────┐
//! │  Transport (trait: the singleton link)   │   │  Bus ──► ObserverSet │
//! │  connect / disconnect / status           │   │  ┌────────┼────────┐ │
//! │  emit / emit_with_ack / frames           │   │  ▼        ▼        ▼ │
//! └──────────────────────────────────────────┘   │ worker  worker  ...  │
//!                                                │  on_event() each     │
//!                                                └──────────────────────┘
//! ```
//!
//! ### Inbound lifecycle
//! ```text
//! transport signal      channel behavior
//! ───────────────       ─────────────────────────────────────────────
//! Connect           ─►  publish Connected;
//!                       if reconnect flag set: clear it,
//!                       publish Reconnected (one-shot per cycle,
//!                       never on the initial connection)
//! Disconnect        ─►  publish Disconnected (no automatic retry)
//! Reconnect         ─►  set reconnect flag
//! Error(reason)     ─►  publish TransportErrored (status unaffected)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                  |
//! |-------------------|----------------------------------------------------------|-------------------------------------|
//! | **Supervision**   | Own the transport, track status, raise notifications.    | [`Channel`], [`Transport`]          |
//! | **Dispatch**      | Route inbound messages to raw or typed handlers.         | [`DispatchTable`]                   |
//! | **Reliable emit** | Bounded-retry acknowledgment protocol.                   | [`Emitter`]                         |
//! | **Codec**         | Wire arguments ⇄ traversable/typed values.               | [`Structured`], [`CodecError`]      |
//! | **Catalogue**     | Closed set of domain event keys with typed parameters.   | [`ApiKey`], [`EmitAction`]          |
//! | **Observers**     | Fan out notifications to the application.                | [`Observe`], [`ObserverSet`]        |
//! | **Errors**        | Typed transport and codec failures.                      | [`TransportError`], [`CodecError`]  |
//! | **Configuration** | Centralize channel settings.                             | [`Config`]                          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use ridewire::{Channel, Config, EmitAction, GeoPoint, Transport};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct WorkerPing { lat: f64, lng: f64 }
//!
//! async fn wire(transport: Arc<dyn Transport>) -> Result<(), Box<dyn std::error::Error>> {
//!     let channel = Channel::new(Config::default(), transport);
//!
//!     channel.observe_typed::<WorkerPing, _>("worker-ping", |ping| {
//!         println!("worker at {}, {}", ping.lat, ping.lng);
//!     });
//!
//!     channel.establish_connection().await?;
//!
//!     channel
//!         .emit_action(EmitAction::UpdateLocation {
//!             customer_id: "c-42".into(),
//!             location: GeoPoint { lat: 24.71, lng: 46.67 },
//!         })
//!         .await;
//!
//!     let acked = channel
//!         .emit_with_ack("get-fare-estimate", serde_json::json!({"customer_id": "c-42"}), 2)
//!         .await;
//!     if !acked {
//!         // retries exhausted; surface to the user
//!     }
//!     Ok(())
//! }
//! ```

mod channel;
mod codec;
mod config;
mod error;
mod events;
mod observers;
mod transport;

pub mod catalogue;
pub mod dispatch;
pub mod emitter;
pub mod locale;
pub mod validate;

// ---- Public re-exports ----

pub use catalogue::{ApiKey, EmitAction, GeoPoint};
pub use channel::Channel;
pub use codec::{Structured, decode_typed, to_structured};
pub use config::Config;
pub use dispatch::DispatchTable;
pub use emitter::Emitter;
pub use error::{CodecError, TransportError};
pub use events::{Bus, ChannelEvent, ChannelEventKind};
pub use locale::{Language, LocalePreference, MemoryStore, SettingsStore};
pub use observers::{Observe, ObserverSet};
pub use transport::{Frame, LinkSignal, LinkStatus, Transport};
pub use validate::{FieldKind, ValidationResult};

// Optional: expose a simple built-in logging observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
