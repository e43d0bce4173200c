//! # Channel: the connection supervisor.
//!
//! [`Channel`] is the single long-lived owner of the transport connection. It
//! tracks connection status, raises lifecycle notifications, feeds the
//! dispatch table from the transport's delivery stream, and exposes the
//! emitter's outbound surface.
//!
//! ## High-level architecture
//! ```text
//! Construction:
//!   Channel::new(cfg, transport)
//!     ├─► Bus (broadcast notifications)
//!     ├─► DispatchTable (key → handlers)
//!     ├─► Emitter (fire-and-forget + acked emission)
//!     └─► receive loop (one task, serialized delivery)
//!
//! Inbound flow:
//!   transport ── Frame::Message ──► receive loop ──► DispatchTable::dispatch
//!             ── Frame::Signal  ──► receive loop ──► status/flag update
//!                                                       └─► Bus.publish(...)
//!
//! Outbound flow:
//!   emit / emit_with_ack / emit_action ──► Emitter ──► transport
//!
//! Observers:
//!   Bus ──► application listeners / ObserverSet fan-out
//! ```
//!
//! ## Rules
//! - The channel is the sole place `connect`/`disconnect` should be called
//!   from, to avoid redundant connect/disconnect races.
//! - Status reads delegate to the transport (read-through) and never block.
//! - Handler invocation is synchronous within the receive loop; a slow
//!   handler stalls subsequent dispatch.
//! - The one-shot `Reconnected` notification fires exactly once per reconnect
//!   cycle and never on the initial connection.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::catalogue::EmitAction;
use crate::config::Config;
use crate::dispatch::DispatchTable;
use crate::emitter::Emitter;
use crate::error::TransportError;
use crate::events::{Bus, ChannelEvent, ChannelEventKind};
use crate::observers::{Observe, ObserverSet};
use crate::transport::{Frame, LinkSignal, LinkStatus, Transport};

/// Owns the transport connection and coordinates dispatch, emission, and
/// lifecycle notifications.
///
/// Construct exactly one per transport and pass it by reference (or inside an
/// `Arc`) to whatever needs it; the explicit instance is what makes the
/// transport swappable with a test double.
///
/// Must be created within a tokio runtime: construction spawns the receive
/// loop task.
pub struct Channel {
    cfg: Config,
    bus: Bus,
    transport: Arc<dyn Transport>,
    table: Arc<DispatchTable>,
    emitter: Emitter,
    reconnecting: Arc<AtomicBool>,
    loop_token: Mutex<Option<CancellationToken>>,
}

impl Channel {
    /// Creates the channel over an injected transport and starts its receive
    /// loop.
    pub fn new(cfg: Config, transport: Arc<dyn Transport>) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let table = Arc::new(DispatchTable::new(bus.clone()));
        let emitter = Emitter::new(Arc::clone(&transport), bus.clone(), cfg.ack_timeout);

        let channel = Self {
            cfg,
            bus,
            transport,
            table,
            emitter,
            reconnecting: Arc::new(AtomicBool::new(false)),
            loop_token: Mutex::new(None),
        };
        channel.ensure_receive_loop();
        channel
    }

    /// Returns the current connection status.
    ///
    /// Read-through to the transport: the transport's own status is
    /// authoritative. Safe to call from any context; never blocks.
    pub fn status(&self) -> LinkStatus {
        self.transport.status()
    }

    /// Initiates the connection unless one is already up or in flight.
    ///
    /// Idempotent: calling while connecting or connected is a no-op. Also
    /// re-arms the receive loop if a previous [`Channel::turn_off_all`]
    /// detached it.
    pub async fn establish_connection(&self) -> Result<(), TransportError> {
        self.ensure_receive_loop();
        if matches!(
            self.status(),
            LinkStatus::Connected | LinkStatus::Connecting
        ) {
            return Ok(());
        }
        self.transport.connect().await
    }

    /// Initiates a graceful disconnect if currently connected; no-op
    /// otherwise.
    pub async fn close_connection(&self) -> Result<(), TransportError> {
        if self.status() != LinkStatus::Connected {
            return Ok(());
        }
        self.transport.disconnect().await
    }

    /// Registers a raw handler for inbound messages tagged `key`.
    ///
    /// Registration re-arms the receive loop if a previous
    /// [`Channel::turn_off_all`] detached it: registering a handler is enough
    /// to resume dispatch. See [`DispatchTable::observe`] for delivery
    /// semantics.
    pub fn observe<F>(&self, key: &str, handler: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.ensure_receive_loop();
        self.table.observe(key, handler);
    }

    /// Registers a typed handler for inbound messages tagged `key`.
    ///
    /// Re-arms the receive loop like [`Channel::observe`]. See
    /// [`DispatchTable::observe_typed`] for delivery and drop semantics.
    pub fn observe_typed<T, F>(&self, key: &str, handler: F)
    where
        T: DeserializeOwned,
        F: Fn(T) + Send + Sync + 'static,
    {
        self.ensure_receive_loop();
        self.table.observe_typed(key, handler);
    }

    /// Fire-and-forget emission. See [`Emitter::emit`].
    pub async fn emit(&self, key: &str, params: Value) {
        self.emitter.emit(key, params).await;
    }

    /// Reliable emission with bounded retry. See [`Emitter::emit_with_ack`].
    pub async fn emit_with_ack(&self, key: &str, params: Value, retry_count: u32) -> bool {
        self.emitter.emit_with_ack(key, params, retry_count).await
    }

    /// Guarded domain emission. See [`Emitter::emit_action`].
    pub async fn emit_action(&self, action: EmitAction) {
        self.emitter.emit_action(action).await;
    }

    /// Unregisters every handler across every key and detaches the receive
    /// loop; used during teardown.
    ///
    /// After this call no dispatch occurs until handlers are re-registered;
    /// registration (or [`Channel::establish_connection`]) re-arms the loop.
    pub fn turn_off_all(&self) {
        self.table.clear();
        if let Ok(mut slot) = self.loop_token.lock() {
            if let Some(token) = slot.take() {
                token.cancel();
            }
        }
    }

    /// Creates a receiver over the channel's notification bus.
    pub fn notifications(&self) -> broadcast::Receiver<ChannelEvent> {
        self.bus.subscribe()
    }

    /// Fans out notifications to a set of observers, each with its own
    /// bounded queue and worker (see [`ObserverSet`]).
    pub fn attach_observers(&self, observers: Vec<Arc<dyn Observe>>) {
        let set = ObserverSet::new(observers);
        let mut rx = self.bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    // A burst only skips events; it must not kill the fan-out.
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Returns the configuration this channel was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Spawns the receive loop unless one is already attached.
    fn ensure_receive_loop(&self) {
        let Ok(mut slot) = self.loop_token.lock() else {
            return;
        };
        if slot.as_ref().is_some_and(|t| !t.is_cancelled()) {
            return;
        }

        let token = CancellationToken::new();
        *slot = Some(token.clone());

        let mut rx = self.transport.frames();
        let table = Arc::clone(&self.table);
        let bus = self.bus.clone();
        let reconnecting = Arc::clone(&self.reconnecting);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    // Cancellation wins over a ready frame: a detached loop
                    // keeps its broadcast receiver until it exits, so without
                    // the bias it could race a replacement loop and dispatch
                    // the same message twice.
                    biased;
                    _ = token.cancelled() => break,
                    res = rx.recv() => match res {
                        Ok(Frame::Message { key, args }) => {
                            if token.is_cancelled() {
                                break;
                            }
                            table.dispatch(&key, &args);
                        }
                        Ok(Frame::Signal(signal)) => apply_signal(signal, &bus, &reconnecting),
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });
    }
}

/// Applies one lifecycle signal on the serialized receive stream.
///
/// Signals only raise notifications and maintain the one-shot reconnect flag;
/// the transport's own status remains authoritative throughout.
fn apply_signal(signal: LinkSignal, bus: &Bus, reconnecting: &AtomicBool) {
    match signal {
        LinkSignal::Connect => {
            bus.publish(ChannelEvent::new(ChannelEventKind::Connected));
            if reconnecting.swap(false, Ordering::SeqCst) {
                bus.publish(ChannelEvent::new(ChannelEventKind::Reconnected));
            }
        }
        LinkSignal::Disconnect => {
            // No automatic retry here: reconnection policy belongs to the
            // transport or the caller.
            bus.publish(ChannelEvent::new(ChannelEventKind::Disconnected));
        }
        LinkSignal::Reconnect => {
            reconnecting.store(true, Ordering::SeqCst);
        }
        LinkSignal::Error(reason) => {
            bus.publish(
                ChannelEvent::new(ChannelEventKind::TransportErrored).with_reason(reason.as_str()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    #[derive(Debug, Deserialize)]
    struct Location {
        lat: f64,
        lng: f64,
    }

    fn setup() -> (Arc<MockTransport>, Channel) {
        let transport = Arc::new(MockTransport::new());
        let channel = Channel::new(Config::default(), transport.clone() as Arc<dyn Transport>);
        (transport, channel)
    }

    /// Lets the receive loop drain everything pushed so far.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    fn drain_kinds(rx: &mut broadcast::Receiver<ChannelEvent>) -> Vec<ChannelEventKind> {
        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        kinds
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_reconnected_on_initial_connection() {
        let (transport, channel) = setup();
        let mut rx = channel.notifications();

        transport.push_frame(Frame::Signal(LinkSignal::Connect));
        settle().await;

        let kinds = drain_kinds(&mut rx);
        assert!(kinds.contains(&ChannelEventKind::Connected));
        assert!(!kinds.contains(&ChannelEventKind::Reconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnected_fires_once_per_cycle() {
        let (transport, channel) = setup();
        let mut rx = channel.notifications();

        transport.push_frame(Frame::Signal(LinkSignal::Connect));
        transport.push_frame(Frame::Signal(LinkSignal::Reconnect));
        transport.push_frame(Frame::Signal(LinkSignal::Connect));
        settle().await;

        let reconnects = drain_kinds(&mut rx)
            .into_iter()
            .filter(|k| *k == ChannelEventKind::Reconnected)
            .count();
        assert_eq!(reconnects, 1);

        // A further connect without a preceding reconnect stays silent.
        transport.push_frame(Frame::Signal(LinkSignal::Connect));
        settle().await;
        assert!(!drain_kinds(&mut rx).contains(&ChannelEventKind::Reconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_dispatched_to_typed_handler() {
        let (transport, channel) = setup();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let s = seen.clone();
        channel.observe_typed::<Location, _>("LOC", move |loc| {
            s.lock().unwrap().push((loc.lat, loc.lng));
        });

        transport.push_frame(Frame::Signal(LinkSignal::Connect));
        transport.push_frame(Frame::Message {
            key: "LOC".into(),
            args: vec![json!({"lat": 1.0, "lng": 2.0})],
        });
        settle().await;

        assert_eq!(*seen.lock().unwrap(), vec![(1.0, 2.0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_off_all_stops_dispatch() {
        let (transport, channel) = setup();
        let hits = Arc::new(AtomicU32::new(0));
        let h = hits.clone();
        channel.observe("LOC", move |_| {
            h.fetch_add(1, Ordering::Relaxed);
        });

        channel.turn_off_all();
        transport.push_frame(Frame::Message {
            key: "LOC".into(),
            args: vec![json!(null)],
        });
        settle().await;

        assert_eq!(hits.load(Ordering::Relaxed), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_establish_rearms_after_turn_off_all() {
        let (transport, channel) = setup();
        channel.turn_off_all();
        channel.establish_connection().await.unwrap();

        let hits = Arc::new(AtomicU32::new(0));
        let h = hits.clone();
        channel.observe("LOC", move |_| {
            h.fetch_add(1, Ordering::Relaxed);
        });

        transport.push_frame(Frame::Message {
            key: "LOC".into(),
            args: vec![json!(null)],
        });
        settle().await;
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_establish_is_idempotent_when_connected() {
        let (transport, channel) = setup();
        transport.set_status(LinkStatus::Connected);
        channel.establish_connection().await.unwrap();
        assert_eq!(transport.connect_calls(), 0);

        transport.set_status(LinkStatus::Connecting);
        channel.establish_connection().await.unwrap();
        assert_eq!(transport.connect_calls(), 0);

        transport.set_status(LinkStatus::Disconnected);
        channel.establish_connection().await.unwrap();
        assert_eq!(transport.connect_calls(), 1);
    }

    #[tokio::test]
    async fn test_close_only_when_connected() {
        let (transport, channel) = setup();
        channel.close_connection().await.unwrap();
        assert_eq!(transport.disconnect_calls(), 0);

        transport.set_status(LinkStatus::Connected);
        channel.close_connection().await.unwrap();
        assert_eq!(transport.disconnect_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_signal_is_diagnostic_only() {
        let (transport, channel) = setup();
        transport.set_status(LinkStatus::Connected);
        let mut rx = channel.notifications();

        transport.push_frame(Frame::Signal(LinkSignal::Error("boom".into())));
        settle().await;

        assert!(drain_kinds(&mut rx).contains(&ChannelEventKind::TransportErrored));
        // Status is unaffected: the transport's own status is authoritative.
        assert_eq!(channel.status(), LinkStatus::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearmed_loop_dispatches_each_frame_once() {
        let (transport, channel) = setup();
        let hits = Arc::new(AtomicU32::new(0));

        // Every cycle leaves another cancelled loop behind; a stale loop that
        // still drains its receiver would double-count the frame.
        for cycle in 1..=5 {
            channel.turn_off_all();
            channel.establish_connection().await.unwrap();
            let h = hits.clone();
            channel.observe("LOC", move |_| {
                h.fetch_add(1, Ordering::Relaxed);
            });

            transport.push_frame(Frame::Message {
                key: "LOC".into(),
                args: vec![json!(null)],
            });
            settle().await;
            assert_eq!(hits.load(Ordering::Relaxed), cycle);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_registration_alone_restores_dispatch() {
        let (transport, channel) = setup();
        channel.turn_off_all();

        let hits = Arc::new(AtomicU32::new(0));
        let h = hits.clone();
        channel.observe("LOC", move |_| {
            h.fetch_add(1, Ordering::Relaxed);
        });

        transport.push_frame(Frame::Message {
            key: "LOC".into(),
            args: vec![json!(null)],
        });
        settle().await;
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    struct CountingObserver {
        seen: AtomicU32,
    }

    #[async_trait::async_trait]
    impl Observe for CountingObserver {
        async fn on_event(&self, _event: &ChannelEvent) {
            self.seen.fetch_add(1, Ordering::Relaxed);
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_forwarding_survives_bus_lag() {
        let transport = Arc::new(MockTransport::new());
        let cfg = Config {
            bus_capacity: 2,
            ..Config::default()
        };
        let channel = Channel::new(cfg, transport as Arc<dyn Transport>);

        let counter = Arc::new(CountingObserver {
            seen: AtomicU32::new(0),
        });
        channel.attach_observers(vec![counter.clone() as Arc<dyn Observe>]);

        // Overflow the bus before the forwarder gets scheduled: it wakes to a
        // Lagged error and must keep forwarding afterwards.
        for _ in 0..10 {
            channel.bus.publish(ChannelEvent::new(ChannelEventKind::Connected));
        }
        settle().await;
        let after_burst = counter.seen.load(Ordering::Relaxed);

        channel
            .bus
            .publish(ChannelEvent::new(ChannelEventKind::Disconnected));
        settle().await;
        assert_eq!(counter.seen.load(Ordering::Relaxed), after_burst + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_signal_raises_notification() {
        let (transport, channel) = setup();
        let mut rx = channel.notifications();

        transport.push_frame(Frame::Signal(LinkSignal::Disconnect));
        settle().await;

        assert!(drain_kinds(&mut rx).contains(&ChannelEventKind::Disconnected));
    }
}
