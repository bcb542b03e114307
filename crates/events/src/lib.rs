//! Shared event contracts for focus arbitration.
//!
//! This crate defines the formal contracts (DTOs) for events that flow
//! from the focus engine to its host. Using shared types prevents runtime
//! deserialization errors from mismatched field names.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{EventBus, EventBusRef, InMemoryEventBus, NullEventBus, PublishedEvent};

use gainkeeper_context::AudioContext;
use serde::{Deserialize, Serialize};

/// Caller-visible result of a focus request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusOutcome {
    Granted,
    /// Accepted for a deferred grant.
    Delayed,
    Failed,
}

/// Focus change dispatched to an affected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusChange {
    /// Permanent loss; the client is no longer tracked.
    Loss,
    /// Temporary loss; focus may come back.
    LossTransient,
    Gain,
    GainTransient,
    GainTransientMayDuck,
}

impl FocusChange {
    pub fn is_loss(&self) -> bool {
        matches!(self, FocusChange::Loss | FocusChange::LossTransient)
    }
}

/// Event emitted once per focus request.
///
/// Producers: focus engine
/// Consumers: transport layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusResultEvent {
    /// Audio zone the request was made in.
    pub zone_id: u32,
    /// Requesting client.
    pub client_id: String,
    /// Context resolved from the request's usage.
    pub context: AudioContext,
    pub outcome: FocusOutcome,
    /// Timestamp in milliseconds.
    #[serde(default)]
    pub timestamp_ms: i64,
}

/// Event emitted for every focus change sent to a client.
///
/// Producers: focus engine
/// Consumers: transport layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusDispatchEvent {
    /// Audio zone the client is tracked in.
    pub zone_id: u32,
    /// Affected client.
    pub client_id: String,
    /// Owning application uid.
    #[serde(default)]
    pub client_uid: u32,
    pub context: AudioContext,
    pub change: FocusChange,
    /// Timestamp in milliseconds.
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl FocusDispatchEvent {
    pub fn now(
        zone_id: u32,
        client_id: impl Into<String>,
        client_uid: u32,
        context: AudioContext,
        change: FocusChange,
    ) -> Self {
        Self {
            zone_id,
            client_id: client_id.into(),
            client_uid,
            context,
            change,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Focus request result event.
    pub const FOCUS_RESULT: &str = "focus:result";
    /// Focus change dispatch event.
    pub const FOCUS_DISPATCH: &str = "focus:dispatch";
}
