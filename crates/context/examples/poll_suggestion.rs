//! Example: Poll a simulated playback feed and print suggestion changes.
//!
//! Run with: cargo run -p gainkeeper-context --example poll_suggestion

use gainkeeper_context::{
    CallState, PlaybackConfiguration, PlaybackStateProvider, SuggestionPoller, Usage,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Feed whose state is flipped by the main thread.
struct SimulatedFeed {
    state: Mutex<(Vec<PlaybackConfiguration>, CallState)>,
}

impl PlaybackStateProvider for SimulatedFeed {
    fn playback_configurations(&self) -> Vec<PlaybackConfiguration> {
        self.state.lock().unwrap().0.clone()
    }

    fn call_state(&self) -> CallState {
        self.state.lock().unwrap().1
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("gainkeeper_context=debug")
        .init();

    println!("=== Suggestion Poller Example ===\n");

    let feed = Arc::new(SimulatedFeed {
        state: Mutex::new((
            vec![PlaybackConfiguration::active(Usage::Media)],
            CallState::Idle,
        )),
    });

    let mut poller = SuggestionPoller::new();
    poller.start_with_interval(
        Arc::clone(&feed),
        Arc::new(|event| {
            println!(
                "[{}] Suggested: {:14} | Call: {:?}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                event.context,
                event.call_state
            );
        }),
        Duration::from_millis(100),
    );

    let steps = [
        (vec![PlaybackConfiguration::active(Usage::Media)], CallState::Ringing),
        (vec![PlaybackConfiguration::active(Usage::Media)], CallState::OffHook),
        (
            vec![
                PlaybackConfiguration::active(Usage::Media),
                PlaybackConfiguration::active(Usage::AssistanceNavigationGuidance),
            ],
            CallState::OffHook,
        ),
        (vec![], CallState::Idle),
    ];

    for step in steps {
        std::thread::sleep(Duration::from_millis(400));
        *feed.state.lock().unwrap() = step;
    }

    std::thread::sleep(Duration::from_millis(400));
    poller.stop();
    println!("\nDone.");
}
