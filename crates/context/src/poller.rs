//! Background tracking of the suggested volume context.

use crate::context::AudioContext;
use crate::provider::PlaybackStateProvider;
use crate::suggest::{suggest_for_configurations, CallState};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// How often the playback feed is sampled unless told otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Sent when the suggested context differs from the previous poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionChangedEvent {
    /// Newly suggested context
    pub context: AudioContext,

    /// Call state the suggestion was computed from
    pub call_state: CallState,

    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

/// Receives suggestion changes on the poller thread.
pub type SuggestionCallback = Arc<dyn Fn(SuggestionChangedEvent) + Send + Sync + 'static>;

/// Remembers the last suggestion and reports only changes.
#[derive(Debug, Default)]
struct ChangeTracker {
    last: Option<AudioContext>,
}

impl ChangeTracker {
    fn observe<P>(&mut self, provider: &P) -> Option<SuggestionChangedEvent>
    where
        P: PlaybackStateProvider + ?Sized,
    {
        let call_state = provider.call_state();
        let context = suggest_for_configurations(&provider.playback_configurations(), call_state);
        if self.last.replace(context) == Some(context) {
            return None;
        }

        tracing::debug!(context = %context, call_state = ?call_state, "suggested context changed");
        Some(SuggestionChangedEvent {
            context,
            call_state,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        })
    }
}

/// Re-evaluates the suggested context on a background thread.
#[derive(Default)]
pub struct SuggestionPoller {
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SuggestionPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<P>(&mut self, provider: Arc<P>, callback: SuggestionCallback)
    where
        P: PlaybackStateProvider + 'static,
    {
        self.start_with_interval(provider, callback, DEFAULT_POLL_INTERVAL);
    }

    /// Poll every `interval`. A second start while running is ignored.
    pub fn start_with_interval<P>(
        &mut self,
        provider: Arc<P>,
        callback: SuggestionCallback,
        interval: Duration,
    ) where
        P: PlaybackStateProvider + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("suggestion poller is already running");
            return;
        }

        let running = Arc::clone(&self.running);
        self.worker = Some(std::thread::spawn(move || {
            tracing::info!(?interval, "suggestion polling started");
            let mut tracker = ChangeTracker::default();
            while running.load(Ordering::SeqCst) {
                if let Some(event) = tracker.observe(provider.as_ref()) {
                    callback(event);
                }
                std::thread::sleep(interval);
            }
            tracing::info!("suggestion polling stopped");
        }));
    }

    /// Stop polling and wait for the worker to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("suggestion poller callback panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for SuggestionPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
