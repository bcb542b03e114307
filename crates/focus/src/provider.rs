//! Collaborator traits consulted during arbitration.
//!
//! Both lookups are assumed to be fast local reads; they are called while
//! the focus stack is locked.

use crate::request::UserId;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

/// Answers whether an application may receive explicit duck notifications.
pub trait CapabilityResolver: Send + Sync {
    fn check_ducking_permission(&self, package_name: &str) -> bool;
}

/// Per-user settings that influence the interaction matrix.
pub trait SettingsStore: Send + Sync {
    /// Whether navigation prompts are rejected while a call holds focus.
    fn is_navigation_rejected_during_call(&self, user_id: UserId) -> bool;
}

/// Resolver that grants the ducking permission to nobody.
pub struct NoDuckingPermission;

impl CapabilityResolver for NoDuckingPermission {
    fn check_ducking_permission(&self, _package_name: &str) -> bool {
        false
    }
}

/// Resolver backed by a fixed set of entitled packages.
#[derive(Debug, Default, Clone)]
pub struct StaticCapabilities {
    granted: HashSet<String>,
}

impl StaticCapabilities {
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            granted: packages.into_iter().map(Into::into).collect(),
        }
    }
}

impl CapabilityResolver for StaticCapabilities {
    fn check_ducking_permission(&self, package_name: &str) -> bool {
        self.granted.contains(package_name)
    }
}

/// Settings store where every setting is off.
pub struct NullSettings;

impl SettingsStore for NullSettings {
    fn is_navigation_rejected_during_call(&self, _user_id: UserId) -> bool {
        false
    }
}

/// Mutable in-memory settings, keyed by user.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    reject_navigation_during_call: RwLock<HashMap<UserId, bool>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_navigation_rejected_during_call(&self, user_id: UserId, rejected: bool) {
        self.reject_navigation_during_call
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(user_id, rejected);
    }
}

impl SettingsStore for InMemorySettings {
    fn is_navigation_rejected_during_call(&self, user_id: UserId) -> bool {
        self.reject_navigation_during_call
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user_id)
            .copied()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_capabilities() {
        let resolver = StaticCapabilities::new(["com.example.maps"]);
        assert!(resolver.check_ducking_permission("com.example.maps"));
        assert!(!resolver.check_ducking_permission("com.example.radio"));
        assert!(!NoDuckingPermission.check_ducking_permission("com.example.maps"));
    }

    #[test]
    fn test_in_memory_settings_are_per_user() {
        let settings = InMemorySettings::new();
        settings.set_navigation_rejected_during_call(10, true);

        assert!(settings.is_navigation_rejected_during_call(10));
        assert!(!settings.is_navigation_rejected_during_call(11));

        settings.set_navigation_rejected_during_call(10, false);
        assert!(!settings.is_navigation_rejected_during_call(10));
    }
}
