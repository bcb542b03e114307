//! Interaction matrix between a focus holder and an incoming request.

use crate::entry::FocusEntry;
use crate::error::{FocusError, Result};
use crate::provider::SettingsStore;
use crate::request::UserId;
use gainkeeper_context::AudioContext;
use std::sync::Arc;

/// How an incoming request relates to a current holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    /// The request must wait (or fail); the holder keeps focus.
    Reject,
    /// The holder must stop.
    Exclusive,
    /// Both may play; the holder may be ducked.
    Concurrent,
}

/// Per-holder verdict on an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Grant,
    Reject,
    Delay,
}

use self::InteractionType::{Concurrent as C, Exclusive as E, Reject as R};

/// Rows are the holder's context, columns the requester's, both in
/// [`AudioContext::ALL`] order.
const INTERACTIONS: [[InteractionType; 12]; 12] = [
    //  MUS NAV VOC RNG CAL ALM NTF SYS EMR SAF VST ANN
    [E, C, E, E, E, E, C, C, E, C, C, E], // MUSIC
    [C, C, E, C, E, C, C, C, E, C, C, C], // NAVIGATION
    [C, R, C, E, E, R, R, R, E, C, C, R], // VOICE_COMMAND
    [R, C, C, C, C, R, R, C, E, C, C, R], // CALL_RING
    [R, C, R, C, C, C, C, R, C, C, C, R], // CALL
    [C, C, E, E, E, C, C, C, E, C, C, R], // ALARM
    [C, C, E, E, E, C, C, C, E, C, C, C], // NOTIFICATION
    [C, C, E, E, E, C, C, C, E, C, C, C], // SYSTEM_SOUND
    [R, R, R, R, C, R, R, R, C, C, R, R], // EMERGENCY
    [C, C, C, C, C, C, C, C, C, C, C, C], // SAFETY
    [C, C, C, C, C, C, C, C, C, C, C, C], // VEHICLE_STATUS
    [E, C, E, E, E, E, C, C, E, C, C, E], // ANNOUNCEMENT
];

fn matrix_index(context: AudioContext) -> Result<usize> {
    AudioContext::ALL
        .iter()
        .position(|&c| c == context)
        .ok_or(FocusError::InvalidContext(context))
}

/// Interaction rules with the per-user navigation-during-call override.
pub struct FocusInteraction {
    settings: Arc<dyn SettingsStore>,
    user_id: Option<UserId>,
}

impl FocusInteraction {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            user_id: None,
        }
    }

    /// Set the user whose settings apply. `None` disables the override.
    pub fn set_user_id_for_settings(&mut self, user_id: Option<UserId>) {
        self.user_id = user_id;
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    fn is_navigation_rejected_during_call(&self) -> bool {
        self.user_id
            .map(|user| self.settings.is_navigation_rejected_during_call(user))
            .unwrap_or(false)
    }

    /// Interaction between a holder context and a requester context.
    ///
    /// # Errors
    ///
    /// Returns [`FocusError::InvalidContext`] if either side is `Invalid`.
    pub fn interaction_type(
        &self,
        holder: AudioContext,
        requester: AudioContext,
    ) -> Result<InteractionType> {
        let row = matrix_index(holder)?;
        let column = matrix_index(requester)?;

        if holder == AudioContext::Call
            && requester == AudioContext::Navigation
            && self.is_navigation_rejected_during_call()
        {
            return Ok(InteractionType::Reject);
        }

        Ok(INTERACTIONS[row][column])
    }

    /// Evaluate a request against one holder.
    ///
    /// Pushes `holder` onto `losers` when it has to give up focus.
    pub fn evaluate_request<'a>(
        &self,
        requester: AudioContext,
        holder: &'a FocusEntry,
        losers: &mut Vec<&'a FocusEntry>,
        allows_ducking: bool,
        accepts_delayed_focus: bool,
    ) -> Result<Verdict> {
        let verdict = match self.interaction_type(holder.context(), requester)? {
            InteractionType::Reject => {
                if accepts_delayed_focus {
                    Verdict::Delay
                } else {
                    Verdict::Reject
                }
            }
            InteractionType::Exclusive => {
                losers.push(holder);
                Verdict::Grant
            }
            InteractionType::Concurrent => {
                // Holders that neither pause nor hear about ducking are ducked silently
                if !allows_ducking
                    || holder.wants_pause_instead_of_ducking()
                    || holder.receives_duck_events()
                {
                    losers.push(holder);
                }
                Verdict::Grant
            }
        };

        tracing::trace!(
            holder = %holder.client_id(),
            holder_context = %holder.context(),
            requester = %requester,
            ?verdict,
            "evaluated focus interaction"
        );
        Ok(verdict)
    }
}
