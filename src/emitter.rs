//! # Acknowledged emitter: reliable one-shot request/acknowledgment.
//!
//! Layers a bounded-retry acknowledgment protocol on top of fire-and-forget
//! emission.
//!
//! ## Attempt loop
//! ```text
//! emit_with_ack(key, params, retry_count = N):
//!
//! loop {
//!   ├─► attempt += 1
//!   ├─► publish AckAttempt { key, attempt }
//!   ├─► transport.emit_with_ack(key, [params], ack_timeout)
//!   │       │
//!   │       ├─ ack[0] == key      ─► return true           (resolve once)
//!   │       ├─ mismatch / timeout ─► consume one retry
//!   │       │     ├─ retries left ─► re-issue identical request
//!   │       │     └─ exhausted    ─► publish AckExhausted, return false
//!   │       └─ non-retryable err  ─► publish AckExhausted, return false
//! }
//! ```
//!
//! ## Rules
//! - `retry_count = N` with no matching ack performs exactly **N + 1**
//!   attempts, each with the same fixed deadline (bounded retry, no backoff).
//! - The chain is sequential: one attempt's deadline elapses before the next
//!   attempt starts. Concurrent calls for different keys are independent.
//! - The returned future resolves exactly once; once it has, no further state
//!   mutation occurs for that call.
//! - There is no cancellation of an in-flight chain; callers that stop caring
//!   must ignore the eventual result.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::catalogue::EmitAction;
use crate::events::{Bus, ChannelEvent, ChannelEventKind};
use crate::transport::{LinkStatus, Transport};

/// Outbound emission over a shared transport, with optional acknowledgment
/// tracking and diagnostics on the notification bus.
pub struct Emitter {
    transport: Arc<dyn Transport>,
    bus: Bus,
    ack_timeout: Duration,
}

impl Emitter {
    /// Creates an emitter over `transport`, publishing diagnostics to `bus`.
    pub fn new(transport: Arc<dyn Transport>, bus: Bus, ack_timeout: Duration) -> Self {
        Self {
            transport,
            bus,
            ack_timeout,
        }
    }

    /// Fire-and-forget emission.
    ///
    /// Always succeeds from the caller's perspective: transport failures
    /// surface only as a `TransportErrored` diagnostic. Not guarded by
    /// connection status; a disconnected transport fails gracefully.
    pub async fn emit(&self, key: &str, params: Value) {
        if let Err(err) = self.transport.emit(key, vec![params]).await {
            self.bus.publish(
                ChannelEvent::new(ChannelEventKind::TransportErrored)
                    .with_key(key)
                    .with_reason(err.as_label()),
            );
        }
    }

    /// Reliable emission: sends and waits for a correlated acknowledgment.
    ///
    /// The acknowledgment matches when its first element equals `key`
    /// exactly. Timeout or mismatch consumes one retry and re-issues the
    /// identical request; `retry_count = N` therefore allows `N + 1` total
    /// attempts. Returns `true` on a matching ack, `false` once the budget is
    /// exhausted. Never fails the caller.
    pub async fn emit_with_ack(&self, key: &str, params: Value, retry_count: u32) -> bool {
        let args = vec![params];
        let mut remaining = retry_count;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            self.bus.publish(
                ChannelEvent::new(ChannelEventKind::AckAttempt)
                    .with_key(key)
                    .with_attempt(attempt),
            );

            match self
                .transport
                .emit_with_ack(key, args.clone(), self.ack_timeout)
                .await
            {
                Ok(ack) if ack_matches(key, &ack) => return true,
                Ok(_) => {}
                Err(err) if err.is_retryable() => {}
                Err(err) => {
                    // A closed or refused transport will not recover by
                    // re-issuing the same request.
                    self.bus.publish(
                        ChannelEvent::new(ChannelEventKind::AckExhausted)
                            .with_key(key)
                            .with_attempt(attempt)
                            .with_reason(err.as_label()),
                    );
                    return false;
                }
            }

            if remaining == 0 {
                self.bus.publish(
                    ChannelEvent::new(ChannelEventKind::AckExhausted)
                        .with_key(key)
                        .with_attempt(attempt)
                        .with_reason("no matching ack"),
                );
                return false;
            }
            remaining -= 1;
        }
    }

    /// Domain convenience wrapper over the closed action set.
    ///
    /// Guarded: if the link is not currently connected, the action is
    /// silently dropped (an `EmitSkipped` diagnostic is published; nothing is
    /// queued or retried).
    pub async fn emit_action(&self, action: EmitAction) {
        if self.transport.status() != LinkStatus::Connected {
            self.bus.publish(
                ChannelEvent::new(ChannelEventKind::EmitSkipped).with_key(action.key().as_str()),
            );
            return;
        }
        self.emit(action.key().as_str(), action.params()).await;
    }
}

/// True when the acknowledgment payload's first element equals the event key.
fn ack_matches(key: &str, ack: &[Value]) -> bool {
    ack.first().and_then(Value::as_str) == Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::mock::{AckScript, MockTransport};
    use crate::transport::Frame;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::broadcast;

    fn emitter(transport: Arc<MockTransport>) -> Emitter {
        Emitter::new(transport, Bus::new(64), Duration::from_secs(3))
    }

    fn drain_kinds(rx: &mut broadcast::Receiver<ChannelEvent>) -> Vec<ChannelEventKind> {
        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        kinds
    }

    #[tokio::test]
    async fn test_matching_ack_on_first_attempt() {
        let transport = Arc::new(MockTransport::new());
        transport.script_ack(AckScript::Reply(vec![json!("FARE")]));
        let em = emitter(transport.clone());

        assert!(em.emit_with_ack("FARE", json!({"a": 1}), 2).await);
        assert_eq!(transport.ack_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_perform_n_plus_one_attempts() {
        let transport = Arc::new(MockTransport::new());
        let em = emitter(transport.clone());
        let mut rx = em.bus.subscribe();

        // No ack ever arrives: retry_count = 2 means exactly 3 emissions.
        assert!(!em.emit_with_ack("FARE", json!({"fare": true}), 2).await);
        assert_eq!(transport.ack_attempts(), 3);

        let kinds = drain_kinds(&mut rx);
        let exhausted = kinds
            .iter()
            .filter(|k| **k == ChannelEventKind::AckExhausted)
            .count();
        assert_eq!(exhausted, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mismatched_ack_consumes_a_retry() {
        let transport = Arc::new(MockTransport::new());
        transport.script_ack(AckScript::Reply(vec![json!("WRONG")]));
        transport.script_ack(AckScript::Reply(vec![json!("LOC")]));
        let em = emitter(transport.clone());

        assert!(em.emit_with_ack("LOC", json!(null), 1).await);
        assert_eq!(transport.ack_attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_single_attempt() {
        let transport = Arc::new(MockTransport::new());
        let em = emitter(transport.clone());

        assert!(!em.emit_with_ack("LOC", json!(null), 0).await);
        assert_eq!(transport.ack_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inflight_chains_for_different_keys_are_independent() {
        let transport = Arc::new(MockTransport::new());
        // First poller ("SLOW") gets silence; "FAST" gets its matching ack.
        transport.script_ack(AckScript::Silent);
        transport.script_ack(AckScript::Reply(vec![json!("FAST")]));
        let em = Arc::new(emitter(transport.clone()));

        let slow = {
            let em = em.clone();
            tokio::spawn(async move { em.emit_with_ack("SLOW", json!(1), 0).await })
        };
        tokio::task::yield_now().await;

        // The fast chain completes while the slow chain is still waiting.
        assert!(em.emit_with_ack("FAST", json!(2), 0).await);
        assert!(!slow.await.unwrap());
        assert_eq!(transport.ack_attempts(), 2);
    }

    #[tokio::test]
    async fn test_emit_records_wrapped_params() {
        let transport = Arc::new(MockTransport::new());
        let em = emitter(transport.clone());

        em.emit("update-location", json!({"lat": 1.0})).await;
        let emitted = transport.emitted();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].0, "update-location");
        // Parameters travel as a single-element argument array.
        assert_eq!(emitted[0].1, vec![json!({"lat": 1.0})]);
    }

    #[tokio::test]
    async fn test_emit_action_dropped_while_disconnected() {
        let transport = Arc::new(MockTransport::new());
        let em = emitter(transport.clone());
        let mut rx = em.bus.subscribe();

        em.emit_action(EmitAction::UpdateLocation {
            customer_id: "c-1".into(),
            location: crate::catalogue::GeoPoint { lat: 1.0, lng: 2.0 },
        })
        .await;

        assert!(transport.emitted().is_empty());
        assert!(drain_kinds(&mut rx).contains(&ChannelEventKind::EmitSkipped));
    }

    #[tokio::test]
    async fn test_emit_action_sent_while_connected() {
        let transport = Arc::new(MockTransport::new());
        transport.set_status(LinkStatus::Connected);
        let em = emitter(transport.clone());

        em.emit_action(EmitAction::RequestNearbyWorkers {
            customer_id: "c-1".into(),
            location: crate::catalogue::GeoPoint { lat: 3.0, lng: 4.0 },
        })
        .await;

        let emitted = transport.emitted();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].0, "nearby-workers");
        assert_eq!(
            emitted[0].1,
            vec![json!({"customer_id": "c-1", "current_lat": 3.0, "current_lng": 4.0})]
        );
    }

    /// Transport whose ack path fails terminally instead of timing out.
    struct ClosedTransport {
        frames_tx: broadcast::Sender<Frame>,
    }

    #[async_trait]
    impl Transport for ClosedTransport {
        async fn connect(&self) -> Result<(), TransportError> {
            Err(TransportError::Closed)
        }
        async fn disconnect(&self) -> Result<(), TransportError> {
            Ok(())
        }
        fn status(&self) -> LinkStatus {
            LinkStatus::Disconnected
        }
        async fn emit(&self, _key: &str, _args: Vec<Value>) -> Result<(), TransportError> {
            Err(TransportError::Closed)
        }
        async fn emit_with_ack(
            &self,
            _key: &str,
            _args: Vec<Value>,
            _timeout: Duration,
        ) -> Result<Vec<Value>, TransportError> {
            Err(TransportError::Closed)
        }
        fn frames(&self) -> broadcast::Receiver<Frame> {
            self.frames_tx.subscribe()
        }
    }

    #[tokio::test]
    async fn test_non_retryable_error_short_circuits_the_chain() {
        let (frames_tx, _rx) = broadcast::channel(1);
        let transport = Arc::new(ClosedTransport { frames_tx });
        let em = Emitter::new(transport, Bus::new(8), Duration::from_secs(3));

        // retry budget is irrelevant: a closed transport exhausts immediately.
        assert!(!em.emit_with_ack("FARE", json!(null), 5).await);
    }
}
