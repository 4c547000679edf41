//! GiveTrace Event Bus
//!
//! An explicit, owned replacement for the process-wide custom-event channel:
//! decoupled parts of the client dispatch named events and receive them
//! through registered handlers. `subscribe_once` gives the idempotent
//! registration the scan tracker needs, instead of relying on caller
//! discipline to wire a listener exactly once.
//!
//! Dispatch is synchronous on the caller's thread. Handlers are infallible
//! at the bus level; anything that can fail inside a handler is expected to
//! catch and log its own errors.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handler invoked with a shared event payload.
pub type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Identifies a registered handler for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    /// Registration key for `subscribe_once` de-duplication.
    key: Option<String>,
    handler: Handler,
}

/// Named-topic event bus with guarded single registration.
#[derive(Default)]
pub struct EventBus {
    topics: DashMap<String, Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> SubscriberId {
        SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a handler on `topic`.
    pub fn subscribe<F>(&self, topic: &str, handler: F) -> SubscriberId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = self.allocate_id();
        self.topics.entry(topic.to_string()).or_default().push(Subscriber {
            id,
            key: None,
            handler: Arc::new(handler),
        });
        tracing::debug!(topic, subscriber_id = id.0, "Registered event handler");
        id
    }

    /// Register a handler on `topic` only if no handler with `key` is
    /// already registered there. Returns whether registration happened.
    pub fn subscribe_once<F>(&self, topic: &str, key: &str, handler: F) -> bool
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let mut subscribers = self.topics.entry(topic.to_string()).or_default();

        if subscribers.iter().any(|s| s.key.as_deref() == Some(key)) {
            tracing::debug!(topic, key, "Handler already registered, skipping");
            return false;
        }

        let id = self.allocate_id();
        subscribers.push(Subscriber {
            id,
            key: Some(key.to_string()),
            handler: Arc::new(handler),
        });
        tracing::debug!(topic, key, subscriber_id = id.0, "Registered keyed event handler");
        true
    }

    /// Remove a handler. Returns whether it was present.
    pub fn unsubscribe(&self, topic: &str, id: SubscriberId) -> bool {
        let Some(mut subscribers) = self.topics.get_mut(topic) else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        before != subscribers.len()
    }

    /// Dispatch a payload to every handler on `topic`, synchronously, in
    /// registration order. Returns the number of handlers invoked.
    pub fn dispatch(&self, topic: &str, payload: &Value) -> usize {
        // Clone handler references out of the map first so handlers may
        // re-enter the bus (dispatch or subscribe) without deadlocking.
        let handlers: Vec<Handler> = match self.topics.get(topic) {
            Some(subscribers) => subscribers.iter().map(|s| Arc::clone(&s.handler)).collect(),
            None => Vec::new(),
        };

        for handler in &handlers {
            handler(payload);
        }

        tracing::trace!(topic, delivered = handlers.len(), "Dispatched event");
        handlers.len()
    }

    /// Number of handlers currently registered on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, |s| s.len())
    }
}
