//! Focus requests as submitted by clients.

use gainkeeper_context::Usage;
use gainkeeper_events::FocusChange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a user whose settings apply.
pub type UserId = u32;

/// Opaque identity of a requesting session, unique per listener.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ClientId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Requested focus strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusGain {
    /// Indefinite focus.
    Gain,
    /// Brief focus; others must stop.
    GainTransient,
    /// Brief focus; others may keep playing attenuated.
    GainTransientMayDuck,
}

impl FocusGain {
    /// Whether the requester tolerates other streams ducking under it.
    pub fn allows_ducking(&self) -> bool {
        matches!(self, FocusGain::GainTransientMayDuck)
    }

    /// Whether holders evicted by this gain lose focus for good.
    pub fn is_permanent(&self) -> bool {
        matches!(self, FocusGain::Gain)
    }

    /// Change dispatched when focus at this strength is (re)granted.
    pub fn as_change(&self) -> FocusChange {
        match self {
            FocusGain::Gain => FocusChange::Gain,
            FocusGain::GainTransient => FocusChange::GainTransient,
            FocusGain::GainTransientMayDuck => FocusChange::GainTransientMayDuck,
        }
    }
}

/// A single focus request. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusRequest {
    pub client_id: ClientId,
    /// Uid of the owning application
    pub client_uid: u32,
    /// Package name of the owning application
    pub package_name: String,
    pub usage: Usage,
    pub gain: FocusGain,
    pub accepts_delayed_focus: bool,
    pub pauses_instead_of_ducking: bool,
    pub wants_duck_events: bool,
}

impl FocusRequest {
    /// Plain request with no flags and an anonymous owner.
    pub fn new(client_id: impl Into<ClientId>, usage: Usage, gain: FocusGain) -> Self {
        Self {
            client_id: client_id.into(),
            client_uid: 0,
            package_name: String::new(),
            usage,
            gain,
            accepts_delayed_focus: false,
            pauses_instead_of_ducking: false,
            wants_duck_events: false,
        }
    }

    pub fn with_owner(mut self, client_uid: u32, package_name: impl Into<String>) -> Self {
        self.client_uid = client_uid;
        self.package_name = package_name.into();
        self
    }

    pub fn with_delayed_focus(mut self) -> Self {
        self.accepts_delayed_focus = true;
        self
    }

    pub fn with_pause_instead_of_ducking(mut self) -> Self {
        self.pauses_instead_of_ducking = true;
        self
    }

    pub fn with_duck_events(mut self) -> Self {
        self.wants_duck_events = true;
        self
    }
}
