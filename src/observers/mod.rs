//! # Channel event observers.
//!
//! This module provides the [`Observe`] trait and the [`ObserverSet`] fan-out
//! used to deliver [`ChannelEvent`](crate::events::ChannelEvent)s to the rest
//! of the application.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   receive loop / emitter ── publish ──► Bus ──► observer listener
//!                                                     │
//!                                                ObserverSet
//!                                        ┌────────────┼────────────┐
//!                                        ▼            ▼            ▼
//!                                   [queue O1]   [queue O2]   [queue ON]
//!                                        ▼            ▼            ▼
//!                                   worker O1    worker O2    worker ON
//!                                        ▼            ▼            ▼
//!                                  on_event()   on_event()   on_event()
//! ```
//!
//! Typical observers: reconnect-driven resubscription, metrics, logging.
//! Nothing here is part of the functional contract; observer failures never
//! affect dispatch correctness.

mod observe;
mod set;

pub use observe::Observe;
pub use set::ObserverSet;

// Optional: a simple built-in logging observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;
