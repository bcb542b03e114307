//! Example: Walk a single zone through a call interrupting music.
//!
//! Run with: cargo run -p gainkeeper-focus --example focus_walkthrough

use gainkeeper_context::Usage;
use gainkeeper_focus::{
    AudioFocus, FocusChange, FocusEntry, FocusGain, FocusInteraction, FocusListener,
    FocusOutcome, FocusRequest, FocusStack, NoDuckingPermission, NullSettings,
};
use std::sync::Arc;

/// Prints what each client would be told.
struct PrintingListener;

impl FocusListener for PrintingListener {
    fn on_result(&self, request: &FocusRequest, outcome: FocusOutcome) {
        println!("  result   {:10} {:?}", request.client_id, outcome);
    }

    fn on_dispatch(&self, entry: &FocusEntry, change: FocusChange) {
        println!(
            "  dispatch {:10} {:?} ({})",
            entry.client_id(),
            change,
            entry.context()
        );
    }
}

fn report(result: gainkeeper_focus::Result<()>) {
    if let Err(e) = result {
        eprintln!("  error: {e}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("gainkeeper_focus=debug")
        .init();

    println!("=== Audio Focus Walkthrough ===\n");

    let stack = FocusStack::new(
        FocusInteraction::new(Arc::new(NullSettings)),
        Arc::new(NoDuckingPermission),
        true,
    );
    let focus = AudioFocus::new(0, stack, Arc::new(PrintingListener));

    let music = FocusRequest::new("player", Usage::Media, FocusGain::Gain);
    let nav = FocusRequest::new(
        "maps",
        Usage::AssistanceNavigationGuidance,
        FocusGain::GainTransientMayDuck,
    );
    let call = FocusRequest::new("dialer", Usage::VoiceCommunication, FocusGain::GainTransient);
    let podcast =
        FocusRequest::new("podcast", Usage::Media, FocusGain::Gain).with_delayed_focus();

    println!("music starts:");
    report(focus.request(music).map(drop));
    println!("navigation prompt ducks music:");
    report(focus.request(nav.clone()).map(drop));
    println!("prompt ends:");
    report(focus.abandon(&nav));
    println!("call comes in:");
    report(focus.request(call.clone()).map(drop));
    println!("podcast waits for the call:");
    report(focus.request(podcast).map(drop));
    println!("call ends:");
    report(focus.abandon(&call));

    println!("\nFinal stack:");
    match serde_json::to_string_pretty(&focus.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("  error: {e}"),
    }
}
