//! Provider traits for playback and telephony state.
//!
//! These traits abstract the host's UI and telephony feeds,
//! allowing the suggestion logic to remain pure and testable.

use crate::suggest::{CallState, PlaybackConfiguration};

/// Combined provider for the state that drives volume suggestions.
pub trait PlaybackStateProvider: Send + Sync {
    /// Snapshot of the current playback configurations.
    fn playback_configurations(&self) -> Vec<PlaybackConfiguration>;

    /// Current telephony call state.
    fn call_state(&self) -> CallState;
}

/// Null implementation for testing or hosts without a feed.
pub struct NullProvider;

impl PlaybackStateProvider for NullProvider {
    fn playback_configurations(&self) -> Vec<PlaybackConfiguration> {
        Vec::new()
    }

    fn call_state(&self) -> CallState {
        CallState::Idle
    }
}
