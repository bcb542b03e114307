//! Tracked focus entries.

use crate::provider::CapabilityResolver;
use crate::request::{ClientId, FocusGain, FocusRequest};
use gainkeeper_context::{context_for_usage, AudioContext};

/// Snapshot of one accepted request plus the attributes derived from it.
///
/// Built once when a request is accepted and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusEntry {
    request: FocusRequest,
    context: AudioContext,
    receives_duck_events: bool,
}

impl FocusEntry {
    pub fn new(request: FocusRequest, capabilities: &dyn CapabilityResolver) -> Self {
        let context = context_for_usage(request.usage);
        let receives_duck_events = request.wants_duck_events
            && capabilities.check_ducking_permission(&request.package_name);

        Self {
            request,
            context,
            receives_duck_events,
        }
    }

    pub fn request(&self) -> &FocusRequest {
        &self.request
    }

    pub fn client_id(&self) -> &ClientId {
        &self.request.client_id
    }

    pub fn client_uid(&self) -> u32 {
        self.request.client_uid
    }

    pub fn context(&self) -> AudioContext {
        self.context
    }

    pub fn gain(&self) -> FocusGain {
        self.request.gain
    }

    pub fn wants_pause_instead_of_ducking(&self) -> bool {
        self.request.pauses_instead_of_ducking
    }

    /// Duck notifications were requested and the owner is entitled to them.
    pub fn receives_duck_events(&self) -> bool {
        self.receives_duck_events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{NoDuckingPermission, StaticCapabilities};
    use gainkeeper_context::Usage;

    fn maps_request() -> FocusRequest {
        FocusRequest::new("nav", Usage::AssistanceNavigationGuidance, FocusGain::GainTransientMayDuck)
            .with_owner(10_051, "com.example.maps")
    }

    #[test]
    fn test_context_is_derived_from_usage() {
        let entry = FocusEntry::new(maps_request(), &NoDuckingPermission);
        assert_eq!(entry.context(), AudioContext::Navigation);
        assert_eq!(entry.client_uid(), 10_051);
    }

    #[test]
    fn test_duck_events_need_request_and_permission() {
        let resolver = StaticCapabilities::new(["com.example.maps"]);

        let entry = FocusEntry::new(maps_request(), &resolver);
        assert!(!entry.receives_duck_events(), "not requested");

        let entry = FocusEntry::new(maps_request().with_duck_events(), &NoDuckingPermission);
        assert!(!entry.receives_duck_events(), "not permitted");

        let entry = FocusEntry::new(maps_request().with_duck_events(), &resolver);
        assert!(entry.receives_duck_events());
    }

    #[test]
    fn test_pause_flag_is_copied() {
        let entry = FocusEntry::new(
            maps_request().with_pause_instead_of_ducking(),
            &NoDuckingPermission,
        );
        assert!(entry.wants_pause_instead_of_ducking());
    }
}
