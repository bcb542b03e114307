//! Audio context taxonomy for gainkeeper.
//!
//! This crate groups stream usages into audio contexts and answers
//! context-level questions that do not depend on focus state:
//! - Which context a usage belongs to (and the reverse lookup)
//! - The volume priority order of contexts
//! - Which context a volume key press should adjust right now
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  usage.rs    - Usage enum and raw codes (pure)              │
//! │  context.rs  - AudioContext, taxonomy, priority (pure)      │
//! │  suggest.rs  - Suggested volume context (pure)              │
//! │  provider.rs - Traits for playback/telephony state          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Application Layer                          │
//! │  poller.rs - Background polling and event emission          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use gainkeeper_context::{suggest_audio_context, AudioContext, CallState, Usage};
//!
//! let context = suggest_audio_context(&[Usage::Media], CallState::OffHook);
//! assert_eq!(context, AudioContext::Call);
//! ```

mod context;
mod error;
mod poller;
mod provider;
mod suggest;
mod usage;

// Re-export main types
pub use context::{
    context_for_usage, priority_rank, usages_for_context, AudioContext, DEFAULT_AUDIO_CONTEXT,
};
pub use error::{ContextError, Result};
pub use poller::{SuggestionCallback, SuggestionChangedEvent, SuggestionPoller, DEFAULT_POLL_INTERVAL};
pub use provider::{NullProvider, PlaybackStateProvider};
pub use suggest::{
    suggest_audio_context, suggest_for_configurations, CallState, PlaybackConfiguration,
};
pub use usage::Usage;
