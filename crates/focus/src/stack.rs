//! The focus stack: who holds focus, who is waiting to get it back, and
//! which single request is waiting for its first grant.
//!
//! `FocusStack` is plain single-owner state. Every call computes its result
//! and the complete list of dispatches from the state it started with; the
//! caller decides when to deliver them. Thread safety lives one level up in
//! [`crate::AudioFocus`].

use crate::entry::FocusEntry;
use crate::error::Result;
use crate::interaction::{FocusInteraction, Verdict};
use crate::provider::CapabilityResolver;
use crate::request::{ClientId, FocusGain, FocusRequest, UserId};
use gainkeeper_context::{context_for_usage, AudioContext};
use gainkeeper_events::{FocusChange, FocusOutcome};
use serde::Serialize;
use std::sync::Arc;

/// A focus change addressed to one tracked entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub entry: FocusEntry,
    pub change: FocusChange,
}

impl Dispatch {
    fn new(entry: FocusEntry, change: FocusChange) -> Self {
        Self { entry, change }
    }
}

/// Result of a focus request plus the dispatches it caused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub outcome: FocusOutcome,
    pub dispatches: Vec<Dispatch>,
}

impl Decision {
    fn unchanged(outcome: FocusOutcome) -> Self {
        Self {
            outcome,
            dispatches: Vec::new(),
        }
    }
}

/// Where a tracked entry currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    Active,
    /// Transiently preempted; restorable.
    DuckedOut,
    /// Accepted for a deferred grant.
    Pending,
}

/// Serializable view of one tracked entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySnapshot {
    pub client_id: ClientId,
    pub client_uid: u32,
    pub context: AudioContext,
    pub gain: FocusGain,
    pub receives_duck_events: bool,
}

impl From<&FocusEntry> for EntrySnapshot {
    fn from(entry: &FocusEntry) -> Self {
        Self {
            client_id: entry.client_id().clone(),
            client_uid: entry.client_uid(),
            context: entry.context(),
            gain: entry.gain(),
            receives_duck_events: entry.receives_duck_events(),
        }
    }
}

/// Owned copy of the stack for dumps and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusSnapshot {
    pub holders: Vec<EntrySnapshot>,
    pub ducked_out: Vec<EntrySnapshot>,
    pub pending: Option<EntrySnapshot>,
}

/// Outcome of scanning a candidate against a set of tracked entries.
struct Admission {
    losers: Vec<ClientId>,
    blocked: bool,
}

impl Admission {
    fn is_clear(&self) -> bool {
        !self.blocked && self.losers.is_empty()
    }
}

pub struct FocusStack {
    interaction: FocusInteraction,
    capabilities: Arc<dyn CapabilityResolver>,
    delayed_focus_enabled: bool,
    holders: Vec<FocusEntry>,
    ducked_out: Vec<FocusEntry>,
    pending: Option<FocusEntry>,
}

impl FocusStack {
    pub fn new(
        interaction: FocusInteraction,
        capabilities: Arc<dyn CapabilityResolver>,
        delayed_focus_enabled: bool,
    ) -> Self {
        Self {
            interaction,
            capabilities,
            delayed_focus_enabled,
            holders: Vec::new(),
            ducked_out: Vec::new(),
            pending: None,
        }
    }

    pub fn set_user_id_for_settings(&mut self, user_id: Option<UserId>) {
        self.interaction.set_user_id_for_settings(user_id);
    }

    fn tracked(&self) -> impl Iterator<Item = &FocusEntry> {
        self.holders
            .iter()
            .chain(self.ducked_out.iter())
            .chain(self.pending.iter())
    }

    fn find(&self, client_id: &ClientId) -> Option<&FocusEntry> {
        self.tracked().find(|entry| entry.client_id() == client_id)
    }

    pub fn state_of(&self, client_id: &ClientId) -> Option<EntryState> {
        if self.holders.iter().any(|e| e.client_id() == client_id) {
            Some(EntryState::Active)
        } else if self.ducked_out.iter().any(|e| e.client_id() == client_id) {
            Some(EntryState::DuckedOut)
        } else if self.pending.as_ref().map(|e| e.client_id()) == Some(client_id) {
            Some(EntryState::Pending)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracked().next().is_none()
    }

    /// Scan `against` as if a request for `context` at `gain` had arrived.
    fn admit<'a>(
        &self,
        context: AudioContext,
        gain: FocusGain,
        accepts_delayed_focus: bool,
        against: impl Iterator<Item = &'a FocusEntry>,
    ) -> Result<Admission> {
        let mut losers = Vec::new();
        let mut blocked = false;

        for holder in against {
            let verdict = self.interaction.evaluate_request(
                context,
                holder,
                &mut losers,
                gain.allows_ducking(),
                accepts_delayed_focus,
            )?;
            if verdict != Verdict::Grant {
                blocked = true;
            }
        }

        Ok(Admission {
            losers: losers.into_iter().map(|e| e.client_id().clone()).collect(),
            blocked,
        })
    }

    /// Take focus away from every loser according to the requester's gain.
    ///
    /// Permanent gains remove losers outright. Transient gains move active
    /// losers to the ducked-out list; entries already ducked out stay there
    /// without another notification. A pending entry can only be lost.
    fn evict(&mut self, losers: &[ClientId], gain: FocusGain, dispatches: &mut Vec<Dispatch>) {
        for client_id in losers {
            if self.pending.as_ref().map(|e| e.client_id()) == Some(client_id) {
                if let Some(entry) = self.pending.take() {
                    dispatches.push(Dispatch::new(entry, FocusChange::Loss));
                }
            } else if let Some(index) = self.holders.iter().position(|e| e.client_id() == client_id) {
                let entry = self.holders.remove(index);
                if gain.is_permanent() {
                    dispatches.push(Dispatch::new(entry, FocusChange::Loss));
                } else {
                    dispatches.push(Dispatch::new(entry.clone(), FocusChange::LossTransient));
                    self.ducked_out.push(entry);
                }
            } else if gain.is_permanent() {
                if let Some(index) = self.ducked_out.iter().position(|e| e.client_id() == client_id) {
                    let entry = self.ducked_out.remove(index);
                    dispatches.push(Dispatch::new(entry, FocusChange::Loss));
                }
            }
        }
    }

    /// Arbitrate a new request.
    ///
    /// # Errors
    ///
    /// Only if a tracked entry carries an unresolved context, which the
    /// stack never admits.
    pub fn request(&mut self, request: FocusRequest) -> Result<Decision> {
        let context = context_for_usage(request.usage);
        if !context.is_valid() {
            tracing::warn!(client = %request.client_id, usage = ?request.usage, "focus request for unrouted usage");
            return Ok(Decision::unchanged(FocusOutcome::Failed));
        }

        if let Some(existing) = self.find(&request.client_id) {
            if existing.context() == context {
                tracing::debug!(client = %request.client_id, context = %context, "repeated focus request");
                return Ok(Decision::unchanged(FocusOutcome::Granted));
            }
            tracing::warn!(
                client = %request.client_id,
                held = %existing.context(),
                requested = %context,
                "client cannot switch context on the same listener"
            );
            return Ok(Decision::unchanged(FocusOutcome::Failed));
        }

        let accepts_delayed_focus = request.accepts_delayed_focus && self.delayed_focus_enabled;
        let admission = self.admit(context, request.gain, accepts_delayed_focus, self.tracked())?;
        let entry = FocusEntry::new(request, self.capabilities.as_ref());
        let mut dispatches = Vec::new();

        if admission.blocked {
            if !accepts_delayed_focus {
                tracing::info!(client = %entry.client_id(), context = %context, "focus request failed");
                return Ok(Decision::unchanged(FocusOutcome::Failed));
            }

            if let Some(superseded) = self.pending.take() {
                tracing::debug!(client = %superseded.client_id(), "pending request superseded");
                dispatches.push(Dispatch::new(superseded, FocusChange::Loss));
            }
            self.evict(&admission.losers, entry.gain(), &mut dispatches);

            tracing::info!(client = %entry.client_id(), context = %context, "focus request delayed");
            self.pending = Some(entry);
            return Ok(Decision {
                outcome: FocusOutcome::Delayed,
                dispatches,
            });
        }

        self.evict(&admission.losers, entry.gain(), &mut dispatches);
        tracing::info!(
            client = %entry.client_id(),
            context = %context,
            evicted = dispatches.len(),
            "focus request granted"
        );
        self.holders.push(entry);

        Ok(Decision {
            outcome: FocusOutcome::Granted,
            dispatches,
        })
    }

    fn remove(&mut self, client_id: &ClientId) -> Option<FocusEntry> {
        if let Some(index) = self.holders.iter().position(|e| e.client_id() == client_id) {
            return Some(self.holders.remove(index));
        }
        if let Some(index) = self.ducked_out.iter().position(|e| e.client_id() == client_id) {
            return Some(self.ducked_out.remove(index));
        }
        if self.pending.as_ref().map(|e| e.client_id()) == Some(client_id) {
            return self.pending.take();
        }
        None
    }

    /// Release a client's focus and restore whoever it was holding back.
    ///
    /// Abandoning an untracked client is a no-op.
    pub fn abandon(&mut self, request: &FocusRequest) -> Result<Vec<Dispatch>> {
        let mut dispatches = Vec::new();

        match self.remove(&request.client_id) {
            Some(entry) => {
                tracing::info!(client = %entry.client_id(), context = %entry.context(), "focus abandoned");
                self.restore_unblocked(&mut dispatches)?;
            }
            None => {
                tracing::debug!(client = %request.client_id, "abandon for untracked client ignored");
            }
        }

        Ok(dispatches)
    }

    /// Restoration pass: ducked-out entries first, then the pending one.
    fn restore_unblocked(&mut self, dispatches: &mut Vec<Dispatch>) -> Result<()> {
        let mut index = 0;
        while index < self.ducked_out.len() {
            let candidate = &self.ducked_out[index];
            let admission = self.admit(
                candidate.context(),
                candidate.gain(),
                false,
                self.holders.iter(),
            )?;

            if !admission.is_clear() {
                index += 1;
                continue;
            }

            let entry = self.ducked_out.remove(index);
            tracing::info!(client = %entry.client_id(), context = %entry.context(), "focus restored");
            dispatches.push(Dispatch::new(entry.clone(), entry.gain().as_change()));
            self.holders.push(entry);
        }

        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        let admission = self.admit(
            pending.context(),
            pending.gain(),
            pending.request().accepts_delayed_focus,
            self.holders.iter().chain(self.ducked_out.iter()),
        )?;

        if admission.blocked {
            self.pending = Some(pending);
            return Ok(());
        }

        self.evict(&admission.losers, pending.gain(), dispatches);
        tracing::info!(client = %pending.client_id(), context = %pending.context(), "delayed focus granted");
        dispatches.push(Dispatch::new(pending.clone(), pending.gain().as_change()));
        self.holders.push(pending);
        Ok(())
    }

    /// Requests currently holding focus for an application uid.
    pub fn holders_for_uid(&self, uid: u32) -> Vec<FocusRequest> {
        self.holders
            .iter()
            .filter(|e| e.client_uid() == uid)
            .map(|e| e.request().clone())
            .collect()
    }

    /// Requests of an application uid waiting for focus (ducked out or pending).
    pub fn losers_for_uid(&self, uid: u32) -> Vec<FocusRequest> {
        self.ducked_out
            .iter()
            .chain(self.pending.iter())
            .filter(|e| e.client_uid() == uid)
            .map(|e| e.request().clone())
            .collect()
    }

    /// Take focus away from specific requests as a transient loss.
    ///
    /// Each tracked request is removed and told `LossTransient`; whoever it
    /// was blocking is restored. Untracked requests are skipped.
    pub fn transiently_lose(&mut self, requests: &[FocusRequest]) -> Result<Vec<Dispatch>> {
        let mut dispatches = Vec::new();
        for request in requests {
            if let Some(entry) = self.remove(&request.client_id) {
                tracing::debug!(client = %entry.client_id(), "focus transiently taken away");
                dispatches.push(Dispatch::new(entry, FocusChange::LossTransient));
                self.restore_unblocked(&mut dispatches)?;
            }
        }
        Ok(dispatches)
    }

    /// Re-run arbitration for a request and tell it when focus is granted.
    pub fn reevaluate_and_regain(&mut self, request: FocusRequest) -> Result<Decision> {
        let mut decision = self.request(request.clone())?;
        if decision.outcome == FocusOutcome::Granted {
            if let Some(entry) = self.find(&request.client_id) {
                decision
                    .dispatches
                    .push(Dispatch::new(entry.clone(), request.gain.as_change()));
            }
        }
        Ok(decision)
    }

    pub fn snapshot(&self) -> FocusSnapshot {
        FocusSnapshot {
            holders: self.holders.iter().map(EntrySnapshot::from).collect(),
            ducked_out: self.ducked_out.iter().map(EntrySnapshot::from).collect(),
            pending: self.pending.as_ref().map(EntrySnapshot::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{InMemorySettings, NoDuckingPermission, NullSettings};
    use gainkeeper_context::Usage;

    fn stack() -> FocusStack {
        FocusStack::new(
            FocusInteraction::new(Arc::new(NullSettings)),
            Arc::new(NoDuckingPermission),
            true,
        )
    }

    fn changes(dispatches: &[Dispatch]) -> Vec<(&str, FocusChange)> {
        dispatches
            .iter()
            .map(|d| (d.entry.client_id().as_str(), d.change))
            .collect()
    }

    fn id(client: &str) -> ClientId {
        ClientId::new(client)
    }

    #[test]
    fn test_first_request_is_granted() {
        let mut stack = stack();
        let decision = stack
            .request(FocusRequest::new("a", Usage::Media, FocusGain::Gain))
            .unwrap();

        assert_eq!(decision.outcome, FocusOutcome::Granted);
        assert!(decision.dispatches.is_empty());
        assert_eq!(stack.state_of(&id("a")), Some(EntryState::Active));
    }

    #[test]
    fn test_unrouted_usage_fails() {
        let mut stack = stack();
        let decision = stack
            .request(FocusRequest::new("a", Usage::VirtualSource, FocusGain::Gain))
            .unwrap();

        assert_eq!(decision.outcome, FocusOutcome::Failed);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_same_client_same_context_is_idempotent() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("a", Usage::Media, FocusGain::Gain))
            .unwrap();
        stack
            .request(FocusRequest::new("b", Usage::AssistanceNavigationGuidance, FocusGain::GainTransientMayDuck))
            .unwrap();
        let before = stack.snapshot();

        // Game resolves to the same context as media
        let decision = stack
            .request(FocusRequest::new("a", Usage::Game, FocusGain::GainTransient))
            .unwrap();

        assert_eq!(decision, Decision::unchanged(FocusOutcome::Granted));
        assert_eq!(stack.snapshot(), before);
    }

    #[test]
    fn test_same_client_different_context_fails() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("a", Usage::Media, FocusGain::Gain))
            .unwrap();
        let before = stack.snapshot();

        let decision = stack
            .request(FocusRequest::new("a", Usage::Alarm, FocusGain::Gain))
            .unwrap();

        assert_eq!(decision.outcome, FocusOutcome::Failed);
        assert_eq!(stack.snapshot(), before);
    }

    #[test]
    fn test_permanent_gain_removes_loser() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("a", Usage::Media, FocusGain::Gain))
            .unwrap();
        let decision = stack
            .request(FocusRequest::new("b", Usage::Media, FocusGain::Gain))
            .unwrap();

        assert_eq!(decision.outcome, FocusOutcome::Granted);
        assert_eq!(changes(&decision.dispatches), vec![("a", FocusChange::Loss)]);
        assert_eq!(stack.state_of(&id("a")), None);
    }

    #[test]
    fn test_transient_gain_ducks_out_loser() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("a", Usage::Media, FocusGain::Gain))
            .unwrap();
        let decision = stack
            .request(FocusRequest::new("b", Usage::Alarm, FocusGain::GainTransient))
            .unwrap();

        assert_eq!(changes(&decision.dispatches), vec![("a", FocusChange::LossTransient)]);
        assert_eq!(stack.state_of(&id("a")), Some(EntryState::DuckedOut));
    }

    #[test]
    fn test_failed_request_changes_nothing() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("call", Usage::VoiceCommunication, FocusGain::GainTransient))
            .unwrap();
        let before = stack.snapshot();

        let decision = stack
            .request(FocusRequest::new("music", Usage::Media, FocusGain::Gain))
            .unwrap();

        assert_eq!(decision, Decision::unchanged(FocusOutcome::Failed));
        assert_eq!(stack.snapshot(), before);
    }

    #[test]
    fn test_delayed_focus_disabled_turns_delay_into_failure() {
        let mut stack = FocusStack::new(
            FocusInteraction::new(Arc::new(NullSettings)),
            Arc::new(NoDuckingPermission),
            false,
        );
        stack
            .request(FocusRequest::new("call", Usage::VoiceCommunication, FocusGain::GainTransient))
            .unwrap();

        let decision = stack
            .request(FocusRequest::new("music", Usage::Media, FocusGain::Gain).with_delayed_focus())
            .unwrap();

        assert_eq!(decision.outcome, FocusOutcome::Failed);
        assert_eq!(stack.state_of(&id("music")), None);
    }

    #[test]
    fn test_pending_superseded_by_newer_delayed_request() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("call", Usage::VoiceCommunication, FocusGain::GainTransient))
            .unwrap();
        stack
            .request(FocusRequest::new("first", Usage::Media, FocusGain::GainTransient).with_delayed_focus())
            .unwrap();

        let decision = stack
            .request(FocusRequest::new("second", Usage::Game, FocusGain::Gain).with_delayed_focus())
            .unwrap();

        assert_eq!(decision.outcome, FocusOutcome::Delayed);
        assert_eq!(changes(&decision.dispatches), vec![("first", FocusChange::Loss)]);
        assert_eq!(stack.state_of(&id("second")), Some(EntryState::Pending));
        assert_eq!(stack.state_of(&id("first")), None);
    }

    #[test]
    fn test_abandon_untracked_is_noop() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("a", Usage::Media, FocusGain::Gain))
            .unwrap();
        let before = stack.snapshot();

        let dispatches = stack
            .abandon(&FocusRequest::new("ghost", Usage::Media, FocusGain::Gain))
            .unwrap();

        assert!(dispatches.is_empty());
        assert_eq!(stack.snapshot(), before);
    }

    #[test]
    fn test_abandon_restores_ducked_out_with_own_gain() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("a", Usage::Media, FocusGain::Gain))
            .unwrap();
        let call = FocusRequest::new("b", Usage::VoiceCommunication, FocusGain::GainTransientMayDuck);
        stack.request(call.clone()).unwrap();

        let dispatches = stack.abandon(&call).unwrap();

        assert_eq!(changes(&dispatches), vec![("a", FocusChange::Gain)]);
        assert_eq!(stack.state_of(&id("a")), Some(EntryState::Active));
    }

    #[test]
    fn test_ducked_out_stays_while_conflicted() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("music", Usage::Media, FocusGain::Gain))
            .unwrap();
        let alarm = FocusRequest::new("alarm", Usage::Alarm, FocusGain::GainTransient);
        stack.request(alarm.clone()).unwrap();
        // Navigation plays under the alarm without evicting it
        stack
            .request(FocusRequest::new("nav", Usage::AssistanceNavigationGuidance, FocusGain::GainTransientMayDuck))
            .unwrap();

        let dispatches = stack.abandon(&alarm).unwrap();

        // Music would evict navigation at plain gain, so it keeps waiting
        assert!(dispatches.is_empty());
        assert_eq!(stack.state_of(&id("music")), Some(EntryState::DuckedOut));
        assert_eq!(stack.state_of(&id("nav")), Some(EntryState::Active));
    }

    #[test]
    fn test_holders_and_losers_for_uid() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("music", Usage::Media, FocusGain::Gain).with_owner(10_001, "radio"))
            .unwrap();
        stack
            .request(
                FocusRequest::new("call", Usage::VoiceCommunication, FocusGain::GainTransient)
                    .with_owner(10_002, "dialer"),
            )
            .unwrap();
        stack
            .request(
                FocusRequest::new("podcast", Usage::Media, FocusGain::GainTransient)
                    .with_owner(10_001, "radio")
                    .with_delayed_focus(),
            )
            .unwrap();

        let holders: Vec<_> = stack.holders_for_uid(10_002).into_iter().map(|r| r.client_id).collect();
        assert_eq!(holders, vec![id("call")]);

        let losers: Vec<_> = stack.losers_for_uid(10_001).into_iter().map(|r| r.client_id).collect();
        assert_eq!(losers, vec![id("music"), id("podcast")]);
        assert!(stack.holders_for_uid(10_001).is_empty());
    }

    #[test]
    fn test_transiently_lose_restores_waiters() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("music", Usage::Media, FocusGain::Gain))
            .unwrap();
        let call = FocusRequest::new("call", Usage::VoiceCommunication, FocusGain::GainTransient);
        stack.request(call.clone()).unwrap();

        let dispatches = stack.transiently_lose(&[call]).unwrap();

        assert_eq!(
            changes(&dispatches),
            vec![("call", FocusChange::LossTransient), ("music", FocusChange::Gain)]
        );
        assert_eq!(stack.state_of(&id("call")), None);
    }

    #[test]
    fn test_reevaluate_and_regain_dispatches_gain() {
        let mut stack = stack();
        let request = FocusRequest::new("nav", Usage::AssistanceNavigationGuidance, FocusGain::GainTransientMayDuck);

        let decision = stack.reevaluate_and_regain(request).unwrap();

        assert_eq!(decision.outcome, FocusOutcome::Granted);
        assert_eq!(changes(&decision.dispatches), vec![("nav", FocusChange::GainTransientMayDuck)]);
    }

    #[test]
    fn test_navigation_rejected_during_call_setting() {
        let settings = Arc::new(InMemorySettings::new());
        settings.set_navigation_rejected_during_call(0, true);
        let mut stack = FocusStack::new(
            FocusInteraction::new(settings),
            Arc::new(NoDuckingPermission),
            true,
        );
        stack
            .request(FocusRequest::new("call", Usage::VoiceCommunication, FocusGain::GainTransient))
            .unwrap();
        let nav = FocusRequest::new("nav", Usage::AssistanceNavigationGuidance, FocusGain::GainTransientMayDuck);

        // Concurrent until a user is selected
        assert_eq!(stack.request(nav.clone()).unwrap().outcome, FocusOutcome::Granted);
        stack.abandon(&nav).unwrap();

        stack.set_user_id_for_settings(Some(0));
        assert_eq!(stack.request(nav).unwrap().outcome, FocusOutcome::Failed);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut stack = stack();
        stack
            .request(FocusRequest::new("a", Usage::Media, FocusGain::Gain).with_owner(10_001, "radio"))
            .unwrap();

        let json = serde_json::to_value(stack.snapshot()).unwrap();
        assert_eq!(json["holders"][0]["client_id"], "a");
        assert_eq!(json["holders"][0]["context"], "MUSIC");
        assert!(json["pending"].is_null());
    }
}
