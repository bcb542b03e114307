//! Audio context definitions and the usage taxonomy.
//!
//! Pure domain logic - no I/O, no platform dependencies.

use crate::error::{ContextError, Result};
use crate::usage::Usage;
use serde::{Deserialize, Serialize};

/// Priority and interaction category that usages are grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioContext {
    /// Sentinel for usages that are not routed anywhere.
    Invalid,
    Music,
    Navigation,
    VoiceCommand,
    CallRing,
    Call,
    Alarm,
    Notification,
    SystemSound,
    Emergency,
    Safety,
    VehicleStatus,
    Announcement,
}

/// Context assumed when nothing more specific applies.
pub const DEFAULT_AUDIO_CONTEXT: AudioContext = AudioContext::Music;

/// Volume priority, highest first. `Invalid` is deliberately absent.
const VOLUME_PRIORITY: [AudioContext; 12] = [
    AudioContext::Navigation,
    AudioContext::Call,
    AudioContext::Music,
    AudioContext::Announcement,
    AudioContext::VoiceCommand,
    AudioContext::CallRing,
    AudioContext::SystemSound,
    AudioContext::Safety,
    AudioContext::Alarm,
    AudioContext::Notification,
    AudioContext::VehicleStatus,
    AudioContext::Emergency,
];

impl AudioContext {
    /// Every valid context, excluding the `Invalid` sentinel.
    pub const ALL: [AudioContext; 12] = [
        AudioContext::Music,
        AudioContext::Navigation,
        AudioContext::VoiceCommand,
        AudioContext::CallRing,
        AudioContext::Call,
        AudioContext::Alarm,
        AudioContext::Notification,
        AudioContext::SystemSound,
        AudioContext::Emergency,
        AudioContext::Safety,
        AudioContext::VehicleStatus,
        AudioContext::Announcement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AudioContext::Invalid => "INVALID",
            AudioContext::Music => "MUSIC",
            AudioContext::Navigation => "NAVIGATION",
            AudioContext::VoiceCommand => "VOICE_COMMAND",
            AudioContext::CallRing => "CALL_RING",
            AudioContext::Call => "CALL",
            AudioContext::Alarm => "ALARM",
            AudioContext::Notification => "NOTIFICATION",
            AudioContext::SystemSound => "SYSTEM_SOUND",
            AudioContext::Emergency => "EMERGENCY",
            AudioContext::Safety => "SAFETY",
            AudioContext::VehicleStatus => "VEHICLE_STATUS",
            AudioContext::Announcement => "ANNOUNCEMENT",
        }
    }

    pub fn is_valid(&self) -> bool {
        *self != AudioContext::Invalid
    }
}

impl std::fmt::Display for AudioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Resolve the context a usage belongs to.
///
/// Total: usages that are not routed resolve to [`AudioContext::Invalid`].
pub fn context_for_usage(usage: Usage) -> AudioContext {
    match usage {
        Usage::Unknown | Usage::Media | Usage::Game => AudioContext::Music,
        Usage::AssistanceNavigationGuidance => AudioContext::Navigation,
        Usage::AssistanceAccessibility | Usage::Assistant => AudioContext::VoiceCommand,
        Usage::NotificationRingtone => AudioContext::CallRing,
        Usage::VoiceCommunication | Usage::VoiceCommunicationSignalling | Usage::CallAssistant => {
            AudioContext::Call
        }
        Usage::Alarm => AudioContext::Alarm,
        Usage::Notification
        | Usage::NotificationCommunicationRequest
        | Usage::NotificationCommunicationInstant
        | Usage::NotificationCommunicationDelayed
        | Usage::NotificationEvent => AudioContext::Notification,
        Usage::AssistanceSonification => AudioContext::SystemSound,
        Usage::Emergency => AudioContext::Emergency,
        Usage::Safety => AudioContext::Safety,
        Usage::VehicleStatus => AudioContext::VehicleStatus,
        Usage::Announcement => AudioContext::Announcement,
        Usage::VirtualSource => AudioContext::Invalid,
    }
}

/// Reverse lookup: the usages grouped under a context.
///
/// # Errors
///
/// Returns [`ContextError::InvalidContext`] for the `Invalid` sentinel.
pub fn usages_for_context(context: AudioContext) -> Result<&'static [Usage]> {
    let usages: &'static [Usage] = match context {
        AudioContext::Invalid => return Err(ContextError::InvalidContext(context)),
        AudioContext::Music => &[Usage::Unknown, Usage::Media, Usage::Game],
        AudioContext::Navigation => &[Usage::AssistanceNavigationGuidance],
        AudioContext::VoiceCommand => &[Usage::AssistanceAccessibility, Usage::Assistant],
        AudioContext::CallRing => &[Usage::NotificationRingtone],
        AudioContext::Call => &[
            Usage::VoiceCommunication,
            Usage::VoiceCommunicationSignalling,
            Usage::CallAssistant,
        ],
        AudioContext::Alarm => &[Usage::Alarm],
        AudioContext::Notification => &[
            Usage::Notification,
            Usage::NotificationCommunicationRequest,
            Usage::NotificationCommunicationInstant,
            Usage::NotificationCommunicationDelayed,
            Usage::NotificationEvent,
        ],
        AudioContext::SystemSound => &[Usage::AssistanceSonification],
        AudioContext::Emergency => &[Usage::Emergency],
        AudioContext::Safety => &[Usage::Safety],
        AudioContext::VehicleStatus => &[Usage::VehicleStatus],
        AudioContext::Announcement => &[Usage::Announcement],
    };
    Ok(usages)
}

/// Position of a context in the volume priority order (0 is highest).
///
/// `None` means the context is unprioritized and never suggested.
pub fn priority_rank(context: AudioContext) -> Option<usize> {
    VOLUME_PRIORITY.iter().position(|&c| c == context)
}
