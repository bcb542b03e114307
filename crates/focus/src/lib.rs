//! Audio focus arbitration for gainkeeper.
//!
//! Applications ask for focus before they play. This crate decides who
//! gets it, who has to give it up, and who is told to wait:
//! - A fixed interaction matrix between audio contexts
//! - One focus stack per zone holding active, ducked-out and pending entries
//! - Restoration of preempted entries once their blockers go away
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  request.rs     - FocusRequest, FocusGain, ClientId (pure)  │
//! │  entry.rs       - Tracked request with derived facts (pure) │
//! │  interaction.rs - Context matrix and evaluation (pure)      │
//! │  stack.rs       - Holders, ducked-out, pending (pure)       │
//! │  provider.rs    - Traits for capabilities and settings      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                          │
//! │  zone.rs     - Locked stack plus listener delivery          │
//! │  zones.rs    - Per-zone routing and uid moves               │
//! │  listener.rs - Outbound notification seam                   │
//! │  config.rs   - JSON configuration                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gainkeeper_context::Usage;
//! use gainkeeper_focus::{
//!     AudioFocus, FocusGain, FocusInteraction, FocusOutcome, FocusRequest, FocusStack,
//!     NoDuckingPermission, NullListener, NullSettings,
//! };
//!
//! let stack = FocusStack::new(
//!     FocusInteraction::new(Arc::new(NullSettings)),
//!     Arc::new(NoDuckingPermission),
//!     true,
//! );
//! let focus = AudioFocus::new(0, stack, Arc::new(NullListener));
//!
//! let music = FocusRequest::new("music", Usage::Media, FocusGain::Gain);
//! assert_eq!(focus.request(music).unwrap(), FocusOutcome::Granted);
//! ```

mod config;
mod entry;
mod error;
mod interaction;
mod listener;
mod provider;
mod request;
mod stack;
mod zone;
mod zones;

// Re-export main types
pub use config::{FocusConfig, PRIMARY_ZONE_ID};
pub use entry::FocusEntry;
pub use error::{ConfigError, FocusError, Result};
pub use interaction::{FocusInteraction, InteractionType, Verdict};
pub use listener::{EventBusListener, FocusListener, NullListener, Recorded, RecordingListener};
pub use provider::{
    CapabilityResolver, InMemorySettings, NoDuckingPermission, NullSettings, SettingsStore,
    StaticCapabilities,
};
pub use request::{ClientId, FocusGain, FocusRequest, UserId};
pub use stack::{Decision, Dispatch, EntrySnapshot, EntryState, FocusSnapshot, FocusStack};
pub use zone::{AudioFocus, UidFocus};
pub use zones::ZonesAudioFocus;

pub use gainkeeper_events::{FocusChange, FocusOutcome};
