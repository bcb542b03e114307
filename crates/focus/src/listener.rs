//! Outbound seam: how results and focus changes leave the engine.

use crate::entry::FocusEntry;
use crate::request::{ClientId, FocusRequest};
use gainkeeper_context::context_for_usage;
use gainkeeper_events::{
    event_names, EventBusRef, FocusChange, FocusDispatchEvent, FocusOutcome, FocusResultEvent,
};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Receives request results and focus changes from an [`crate::AudioFocus`].
///
/// Calls are fire-and-forget and are made after the stack lock is released,
/// so implementations may call back into the engine.
pub trait FocusListener: Send + Sync {
    /// Called exactly once per request.
    fn on_result(&self, request: &FocusRequest, outcome: FocusOutcome);

    /// Called once per affected entry.
    fn on_dispatch(&self, entry: &FocusEntry, change: FocusChange);
}

/// Listener that drops everything.
pub struct NullListener;

impl FocusListener for NullListener {
    fn on_result(&self, _request: &FocusRequest, _outcome: FocusOutcome) {}

    fn on_dispatch(&self, _entry: &FocusEntry, _change: FocusChange) {}
}

/// Something a [`RecordingListener`] saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Result(ClientId, FocusOutcome),
    Dispatch(ClientId, FocusChange),
}

/// Listener that records every call, for tests and diagnostics.
#[derive(Default)]
pub struct RecordingListener {
    recorded: Mutex<Vec<Recorded>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Recorded>> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything recorded, in call order.
    pub fn recorded(&self) -> Vec<Recorded> {
        self.lock().clone()
    }

    /// Focus changes sent to one client, in order.
    pub fn dispatches_for(&self, client_id: &str) -> Vec<FocusChange> {
        self.lock()
            .iter()
            .filter_map(|r| match r {
                Recorded::Dispatch(id, change) if id.as_str() == client_id => Some(*change),
                _ => None,
            })
            .collect()
    }

    /// Every focus change, in order.
    pub fn dispatches(&self) -> Vec<(ClientId, FocusChange)> {
        self.lock()
            .iter()
            .filter_map(|r| match r {
                Recorded::Dispatch(id, change) => Some((id.clone(), *change)),
                Recorded::Result(..) => None,
            })
            .collect()
    }

    pub fn results(&self) -> Vec<(ClientId, FocusOutcome)> {
        self.lock()
            .iter()
            .filter_map(|r| match r {
                Recorded::Result(id, outcome) => Some((id.clone(), *outcome)),
                Recorded::Dispatch(..) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl FocusListener for RecordingListener {
    fn on_result(&self, request: &FocusRequest, outcome: FocusOutcome) {
        self.lock()
            .push(Recorded::Result(request.client_id.clone(), outcome));
    }

    fn on_dispatch(&self, entry: &FocusEntry, change: FocusChange) {
        self.lock()
            .push(Recorded::Dispatch(entry.client_id().clone(), change));
    }
}

/// Publishes results and dispatches as JSON events on an event bus.
pub struct EventBusListener {
    bus: EventBusRef,
    zone_id: u32,
}

impl EventBusListener {
    pub fn new(bus: EventBusRef, zone_id: u32) -> Self {
        Self { bus, zone_id }
    }

    fn publish<T: serde::Serialize>(&self, topic: &str, event: &T) {
        match serde_json::to_value(event) {
            Ok(payload) => self.bus.emit(topic, payload),
            Err(e) => tracing::error!(topic, error = %e, "failed to encode focus event"),
        }
    }
}

impl FocusListener for EventBusListener {
    fn on_result(&self, request: &FocusRequest, outcome: FocusOutcome) {
        let event = FocusResultEvent {
            zone_id: self.zone_id,
            client_id: request.client_id.to_string(),
            context: context_for_usage(request.usage),
            outcome,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        };
        self.publish(event_names::FOCUS_RESULT, &event);
    }

    fn on_dispatch(&self, entry: &FocusEntry, change: FocusChange) {
        let event = FocusDispatchEvent::now(
            self.zone_id,
            entry.client_id().as_str(),
            entry.client_uid(),
            entry.context(),
            change,
        );
        self.publish(event_names::FOCUS_DISPATCH, &event);
    }
}
