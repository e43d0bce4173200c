//! # ObserverSet: non-blocking fan-out over multiple observers.
//!
//! [`ObserverSet`] distributes each [`ChannelEvent`] to multiple observers
//! **without awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&ChannelEvent)` returns immediately.
//! - Per-observer FIFO (queue order).
//! - Panics inside observers are caught and reported (isolation).
//!
//! ## What it does **not** guarantee
//! - No global ordering across different observers.
//! - No retries on per-observer queue overflow (events are dropped for that
//!   observer).
//!
//! ## Diagram
//! ```text
//!    emit(&ChannelEvent)
//!        │                        (Arc-clone per observer)
//!        ├────────────────► [queue O1] ─► worker O1 ─► on_event()
//!        ├────────────────► [queue O2] ─► worker O2 ─► on_event()
//!        └────────────────► [queue ON] ─► worker ON ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::ChannelEvent;

use super::Observe;

/// Per-observer channel with metadata.
struct ObserverChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<ChannelEvent>>,
}

/// Composite fan-out with per-observer bounded queues and worker tasks.
pub struct ObserverSet {
    channels: Vec<ObserverChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl ObserverSet {
    /// Creates a new set and spawns one worker per observer.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>) -> Self {
        let mut channels = Vec::with_capacity(observers.len());
        let mut workers = Vec::with_capacity(observers.len());

        for obs in observers {
            let cap = obs.queue_capacity().max(1);
            let name = obs.name();
            let (tx, mut rx) = mpsc::channel::<Arc<ChannelEvent>>(cap);
            let o = Arc::clone(&obs);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = o.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        eprintln!("[ridewire] observer '{}' panicked: {:?}", o.name(), panic_err);
                    }
                }
            });

            channels.push(ObserverChannel { name, sender: tx });
            workers.push(handle);
        }

        Self { channels, workers }
    }

    /// Fans out one event to all observers (non-blocking).
    ///
    /// If an observer's queue is **full** or **closed**, the event is dropped
    /// for it and a warning is written with the observer's name.
    pub fn emit(&self, event: &ChannelEvent) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    eprintln!(
                        "[ridewire] observer '{}' dropped event: queue full",
                        channel.name
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    eprintln!(
                        "[ridewire] observer '{}' dropped event: worker closed",
                        channel.name
                    );
                }
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}
