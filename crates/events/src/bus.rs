//! Where focus events go once the engine has decided them.
//!
//! The engine never talks to a transport; hosts plug in an `EventBus` that
//! forwards JSON payloads to wherever clients listen.

use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Sink for focus events. Publishing must not block on the receiver.
pub trait EventBus: Send + Sync {
    /// Publish `payload` under `topic`, one of [`crate::event_names`].
    fn emit(&self, topic: &str, payload: serde_json::Value);
}

/// Shared handle to a bus.
pub type EventBusRef = Arc<dyn EventBus>;

/// One payload kept by [`InMemoryEventBus`].
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Bus that keeps every payload in publication order.
#[derive(Default)]
pub struct InMemoryEventBus {
    published: Mutex<Vec<PublishedEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PublishedEvent>> {
        self.published.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn published(&self) -> Vec<PublishedEvent> {
        self.lock().clone()
    }

    /// Payloads published under `topic`, oldest first.
    pub fn payloads_for(&self, topic: &str) -> Vec<serde_json::Value> {
        self.lock()
            .iter()
            .filter(|event| event.topic == topic)
            .map(|event| event.payload.clone())
            .collect()
    }

    /// Payloads under `topic` decoded into a contract type; others are skipped.
    pub fn decoded<T: DeserializeOwned>(&self, topic: &str) -> Vec<T> {
        self.payloads_for(topic)
            .into_iter()
            .filter_map(|payload| serde_json::from_value(payload).ok())
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl EventBus for InMemoryEventBus {
    fn emit(&self, topic: &str, payload: serde_json::Value) {
        self.lock().push(PublishedEvent {
            topic: topic.to_owned(),
            payload,
        });
    }
}

/// Bus for hosts that do not consume events.
pub struct NullEventBus;

impl EventBus for NullEventBus {
    fn emit(&self, _topic: &str, _payload: serde_json::Value) {}
}
