//! # Event dispatch table: routing inbound messages to registered handlers.
//!
//! Maps an event key to one or more registered handlers and routes decoded
//! payloads to them, with two parallel dispatch disciplines:
//!
//! - [`DispatchTable::observe`] — the handler receives the raw decoded
//!   payload (a generic traversable JSON value).
//! - [`DispatchTable::observe_typed`] — the handler receives a concrete
//!   record type decoded from the first wire argument.
//!
//! ## Rules
//! - Every handler is bound to exactly one key at registration time; a
//!   message for a different key never reaches it.
//! - Multiple handlers per key fire in **registration order**. No ordering
//!   guarantee is made across different keys.
//! - Delivery is at-most-once per inbound message per handler: no buffering,
//!   no replay for handlers registered late.
//! - Undecodable or unusable payloads are **dropped**, not delivered as
//!   errors: the message publishes a [`ChannelEventKind::MessageDropped`]
//!   diagnostic and processing of subsequent messages is unaffected.
//!
//! ## Concurrency
//! Handlers are invoked synchronously on the caller's (the receive loop's)
//! context; a slow handler stalls subsequent dispatch. Long-running work must
//! hand off to the application's own concurrency mechanism.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec;
use crate::events::{Bus, ChannelEvent, ChannelEventKind};

/// Internal handler shape: receives the raw wire argument sequence.
type Route = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Key → ordered handler list, shared between the receive loop and the
/// application's registration calls.
pub struct DispatchTable {
    routes: RwLock<HashMap<String, Vec<Route>>>,
    bus: Bus,
}

impl DispatchTable {
    /// Creates an empty table publishing drop diagnostics to `bus`.
    pub fn new(bus: Bus) -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            bus,
        }
    }

    /// Registers a raw handler for `key`.
    ///
    /// On receipt, the wire arguments pass through the codec into a generic
    /// traversable value. If the codec reports the payload unusable, the
    /// message is dropped silently rather than delivered as an error.
    pub fn observe<F>(&self, key: &str, handler: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let route: Route = Arc::new(move |args| {
            let structured = codec::to_structured(args);
            if !structured.usable {
                return;
            }
            handler(&structured.value);
        });
        self.register(key, route);
    }

    /// Registers a typed handler for `key`.
    ///
    /// On receipt, the first wire argument is decoded into `T`. Decode
    /// failures (malformed shape, type mismatch, empty argument list) drop
    /// the message and publish a `MessageDropped` diagnostic; they never
    /// propagate as a fault.
    pub fn observe_typed<T, F>(&self, key: &str, handler: F)
    where
        T: DeserializeOwned,
        F: Fn(T) + Send + Sync + 'static,
    {
        let bus = self.bus.clone();
        let owned_key = key.to_string();
        let route: Route = Arc::new(move |args| match codec::decode_typed::<T>(args) {
            Ok(decoded) => handler(decoded),
            Err(err) => {
                bus.publish(
                    ChannelEvent::new(ChannelEventKind::MessageDropped)
                        .with_key(owned_key.as_str())
                        .with_reason(err.as_label()),
                );
            }
        });
        self.register(key, route);
    }

    /// Routes one inbound message to every handler registered under `key`,
    /// in registration order. A key with no handlers is a no-op.
    pub fn dispatch(&self, key: &str, args: &[Value]) {
        // Clone the route list out of the lock so a slow handler cannot
        // block registration from other contexts.
        let routes: Vec<Route> = match self.routes.read() {
            Ok(map) => match map.get(key) {
                Some(list) => list.clone(),
                None => return,
            },
            Err(_) => return,
        };
        for route in routes {
            route(args);
        }
    }

    /// Unregisters every handler across every key.
    ///
    /// After this call no dispatch occurs until handlers are re-registered.
    pub fn clear(&self) {
        if let Ok(mut map) = self.routes.write() {
            map.clear();
        }
    }

    /// Number of handlers currently registered under `key`.
    pub fn handler_count(&self, key: &str) -> usize {
        self.routes
            .read()
            .map(|map| map.get(key).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn register(&self, key: &str, route: Route) {
        if let Ok(mut map) = self.routes.write() {
            map.entry(key.to_string()).or_default().push(route);
        }
    }
}
