//! # Simple logging observer for debugging and demos.
//!
//! [`LogWriter`] prints channel events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [connected]
//! [reconnected]
//! [disconnected]
//! [transport-error] reason="connection reset"
//! [dropped] key=nearby-workers reason=codec_shape
//! [ack-attempt] key=get-fare-estimate attempt=2
//! [ack-exhausted] key=get-fare-estimate attempts=3
//! [emit-skipped] key=update-location
//! ```

use async_trait::async_trait;

use crate::events::{ChannelEvent, ChannelEventKind};

use super::Observe;

/// Simple stdout logging observer.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions for debugging and demonstration purposes.
///
/// Not intended for production use — implement a custom [`Observe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &ChannelEvent) {
        match e.kind {
            ChannelEventKind::Connected => {
                println!("[connected]");
            }
            ChannelEventKind::Disconnected => {
                println!("[disconnected]");
            }
            ChannelEventKind::Reconnected => {
                println!("[reconnected]");
            }
            ChannelEventKind::TransportErrored => {
                println!("[transport-error] reason={:?}", e.reason);
            }
            ChannelEventKind::MessageDropped => {
                println!("[dropped] key={:?} reason={:?}", e.key, e.reason);
            }
            ChannelEventKind::AckAttempt => {
                println!("[ack-attempt] key={:?} attempt={:?}", e.key, e.attempt);
            }
            ChannelEventKind::AckExhausted => {
                println!("[ack-exhausted] key={:?} attempts={:?}", e.key, e.attempt);
            }
            ChannelEventKind::EmitSkipped => {
                println!("[emit-skipped] key={:?}", e.key);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
