//! Suggested context for volume controls.
//!
//! Pure business logic - the caller supplies the playback and call snapshot.

use crate::context::{context_for_usage, priority_rank, AudioContext, DEFAULT_AUDIO_CONTEXT};
use crate::usage::Usage;
use serde::{Deserialize, Serialize};

/// Telephony call state as reported by the call feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    #[default]
    Idle,
    Ringing,
    OffHook,
}

impl CallState {
    /// Context implied by the call state alone.
    pub fn implied_context(&self) -> Option<AudioContext> {
        match self {
            CallState::Idle => None,
            CallState::Ringing => Some(AudioContext::CallRing),
            CallState::OffHook => Some(AudioContext::Call),
        }
    }
}

/// One entry of a playback-configuration snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfiguration {
    pub usage: Usage,
    /// Whether the player is currently producing audio
    pub active: bool,
}

impl PlaybackConfiguration {
    pub fn active(usage: Usage) -> Self {
        Self {
            usage,
            active: true,
        }
    }

    pub fn inactive(usage: Usage) -> Self {
        Self {
            usage,
            active: false,
        }
    }
}

/// Suggest the context a volume key press should adjust.
///
/// Candidates are the call-state context plus the context of every active
/// usage that has a priority rank. The highest-priority candidate wins;
/// with no candidates the default context is returned.
pub fn suggest_audio_context(active_usages: &[Usage], call_state: CallState) -> AudioContext {
    call_state
        .implied_context()
        .into_iter()
        .chain(active_usages.iter().map(|&usage| context_for_usage(usage)))
        .filter_map(|context| priority_rank(context).map(|rank| (rank, context)))
        .min_by_key(|&(rank, _)| rank)
        .map(|(_, context)| context)
        .unwrap_or(DEFAULT_AUDIO_CONTEXT)
}

/// Same as [`suggest_audio_context`], skipping inactive configurations.
pub fn suggest_for_configurations(
    configurations: &[PlaybackConfiguration],
    call_state: CallState,
) -> AudioContext {
    let active: Vec<Usage> = configurations
        .iter()
        .filter(|config| config.active)
        .map(|config| config.usage)
        .collect();
    suggest_audio_context(&active, call_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_defaults_to_music() {
        assert_eq!(suggest_audio_context(&[], CallState::Idle), AudioContext::Music);
    }

    #[test]
    fn test_ringing_suggests_call_ring() {
        assert_eq!(
            suggest_audio_context(&[], CallState::Ringing),
            AudioContext::CallRing
        );
    }

    #[test]
    fn test_offhook_suggests_call() {
        assert_eq!(suggest_audio_context(&[], CallState::OffHook), AudioContext::Call);
    }

    #[test]
    fn test_navigation_beats_call() {
        let usages = [Usage::AssistanceNavigationGuidance];
        assert_eq!(
            suggest_audio_context(&usages, CallState::OffHook),
            AudioContext::Navigation
        );
    }

    #[test]
    fn test_call_beats_alarm_and_notification() {
        let usages = [Usage::Alarm, Usage::Notification, Usage::VoiceCommunication];
        assert_eq!(suggest_audio_context(&usages, CallState::Idle), AudioContext::Call);
    }

    #[test]
    fn test_alarm_beats_notification() {
        let usages = [Usage::Notification, Usage::Alarm];
        assert_eq!(suggest_audio_context(&usages, CallState::Idle), AudioContext::Alarm);
    }

    #[test]
    fn test_unprioritized_usage_is_ignored() {
        let usages = [Usage::VirtualSource];
        assert_eq!(suggest_audio_context(&usages, CallState::Idle), DEFAULT_AUDIO_CONTEXT);

        let usages = [Usage::VirtualSource, Usage::Alarm];
        assert_eq!(suggest_audio_context(&usages, CallState::Idle), AudioContext::Alarm);
    }

    #[test]
    fn test_inactive_configurations_are_skipped() {
        let configs = [
            PlaybackConfiguration::inactive(Usage::AssistanceNavigationGuidance),
            PlaybackConfiguration::active(Usage::Notification),
        ];
        assert_eq!(
            suggest_for_configurations(&configs, CallState::Idle),
            AudioContext::Notification
        );
    }
}
