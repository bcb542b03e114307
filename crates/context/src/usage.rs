//! Stream usages as declared by playback clients.

use serde::{Deserialize, Serialize};

/// Caller-declared category of an audio stream.
///
/// Values mirror the platform's raw usage codes. Codes at or above 1000 are
/// privileged system usages which only trusted clients may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    Unknown,
    Media,
    VoiceCommunication,
    VoiceCommunicationSignalling,
    Alarm,
    Notification,
    NotificationRingtone,
    NotificationCommunicationRequest,
    NotificationCommunicationInstant,
    NotificationCommunicationDelayed,
    NotificationEvent,
    AssistanceAccessibility,
    AssistanceNavigationGuidance,
    AssistanceSonification,
    Game,
    /// Not routed to any output; resolves to no context.
    VirtualSource,
    Assistant,
    CallAssistant,
    Emergency,
    Safety,
    VehicleStatus,
    Announcement,
}

impl Usage {
    /// Every usage, in raw-code order.
    pub const ALL: [Usage; 22] = [
        Usage::Unknown,
        Usage::Media,
        Usage::VoiceCommunication,
        Usage::VoiceCommunicationSignalling,
        Usage::Alarm,
        Usage::Notification,
        Usage::NotificationRingtone,
        Usage::NotificationCommunicationRequest,
        Usage::NotificationCommunicationInstant,
        Usage::NotificationCommunicationDelayed,
        Usage::NotificationEvent,
        Usage::AssistanceAccessibility,
        Usage::AssistanceNavigationGuidance,
        Usage::AssistanceSonification,
        Usage::Game,
        Usage::VirtualSource,
        Usage::Assistant,
        Usage::CallAssistant,
        Usage::Emergency,
        Usage::Safety,
        Usage::VehicleStatus,
        Usage::Announcement,
    ];

    /// Raw platform code for this usage.
    pub fn raw(&self) -> i32 {
        match self {
            Usage::Unknown => 0,
            Usage::Media => 1,
            Usage::VoiceCommunication => 2,
            Usage::VoiceCommunicationSignalling => 3,
            Usage::Alarm => 4,
            Usage::Notification => 5,
            Usage::NotificationRingtone => 6,
            Usage::NotificationCommunicationRequest => 7,
            Usage::NotificationCommunicationInstant => 8,
            Usage::NotificationCommunicationDelayed => 9,
            Usage::NotificationEvent => 10,
            Usage::AssistanceAccessibility => 11,
            Usage::AssistanceNavigationGuidance => 12,
            Usage::AssistanceSonification => 13,
            Usage::Game => 14,
            Usage::VirtualSource => 15,
            Usage::Assistant => 16,
            Usage::CallAssistant => 17,
            Usage::Emergency => 1000,
            Usage::Safety => 1001,
            Usage::VehicleStatus => 1002,
            Usage::Announcement => 1003,
        }
    }

    /// Look up a usage by its raw platform code.
    pub fn from_raw(raw: i32) -> Option<Usage> {
        Usage::ALL.iter().copied().find(|usage| usage.raw() == raw)
    }

    /// Whether this is a privileged system usage.
    pub fn is_system_usage(&self) -> bool {
        self.raw() >= 1000
    }
}
