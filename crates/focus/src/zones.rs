//! Focus routing across several audio zones.

use crate::config::FocusConfig;
use crate::error::{FocusError, Result};
use crate::interaction::FocusInteraction;
use crate::listener::FocusListener;
use crate::provider::{CapabilityResolver, SettingsStore};
use crate::request::{FocusRequest, UserId};
use crate::stack::FocusStack;
use crate::zone::AudioFocus;
use gainkeeper_events::FocusOutcome;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One independent [`AudioFocus`] per configured zone.
pub struct ZonesAudioFocus {
    zones: BTreeMap<u32, AudioFocus>,
}

impl ZonesAudioFocus {
    /// Build one focus stack per configured zone.
    ///
    /// `listener_for_zone` supplies the outbound listener of each zone.
    pub fn from_config<F>(
        config: &FocusConfig,
        capabilities: Arc<dyn CapabilityResolver>,
        settings: Arc<dyn SettingsStore>,
        mut listener_for_zone: F,
    ) -> Result<Self>
    where
        F: FnMut(u32) -> Arc<dyn FocusListener>,
    {
        config.validate()?;

        let zones = config
            .zones
            .iter()
            .map(|&zone_id| {
                let stack = FocusStack::new(
                    FocusInteraction::new(Arc::clone(&settings)),
                    Arc::clone(&capabilities),
                    config.delayed_focus_enabled,
                );
                (zone_id, AudioFocus::new(zone_id, stack, listener_for_zone(zone_id)))
            })
            .collect();

        tracing::info!(zones = ?config.zones, delayed = config.delayed_focus_enabled, "focus zones ready");
        Ok(Self { zones })
    }

    pub fn zone(&self, zone_id: u32) -> Result<&AudioFocus> {
        self.zones
            .get(&zone_id)
            .ok_or(FocusError::UnknownZone(zone_id))
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.zones.keys().copied()
    }

    pub fn request(&self, zone_id: u32, request: FocusRequest) -> Result<FocusOutcome> {
        self.zone(zone_id)?.request(request)
    }

    pub fn abandon(&self, zone_id: u32, request: &FocusRequest) -> Result<()> {
        self.zone(zone_id)?.abandon(request)
    }

    /// Apply the current user to every zone.
    pub fn set_user_id_for_settings(&self, user_id: Option<UserId>) {
        for zone in self.zones.values() {
            zone.set_user_id_for_settings(user_id);
        }
    }

    /// Move everything an application uid has in one zone to another.
    ///
    /// Waiting requests are taken away before active ones so they cannot be
    /// restored in the old zone while its holders are being removed. In the
    /// new zone they are re-arbitrated in the same order. Returns the
    /// requests that could not be granted in the new zone.
    pub fn move_uid(&self, uid: u32, from_zone: u32, to_zone: u32) -> Result<Vec<FocusRequest>> {
        let from = self.zone(from_zone)?;
        let to = self.zone(to_zone)?;

        let moving = from.focus_for_uid(uid);
        if moving.is_empty() {
            return Ok(Vec::new());
        }

        let requests: Vec<FocusRequest> = moving.losers.into_iter().chain(moving.holders).collect();
        from.transiently_lose(&requests)?;

        let mut not_granted = Vec::new();
        for request in requests {
            if to.reevaluate_and_regain(request.clone())? != FocusOutcome::Granted {
                tracing::info!(
                    client = %request.client_id,
                    uid,
                    zone = to_zone,
                    "focus could not be regained after zone move"
                );
                not_granted.push(request);
            }
        }

        Ok(not_granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::{NullListener, RecordingListener};
    use crate::provider::{NoDuckingPermission, NullSettings};
    use crate::request::{ClientId, FocusGain};
    use crate::stack::EntryState;
    use gainkeeper_context::Usage;
    use gainkeeper_events::FocusChange;

    fn zones(ids: Vec<u32>) -> ZonesAudioFocus {
        let config = FocusConfig {
            zones: ids,
            ..FocusConfig::default()
        };
        ZonesAudioFocus::from_config(
            &config,
            Arc::new(NoDuckingPermission),
            Arc::new(NullSettings),
            |_| Arc::new(NullListener),
        )
        .unwrap()
    }

    #[test]
    fn test_zones_are_independent() {
        let zones = zones(vec![0, 1]);

        zones
            .request(0, FocusRequest::new("front", Usage::Media, FocusGain::Gain))
            .unwrap();
        let outcome = zones
            .request(1, FocusRequest::new("rear", Usage::Media, FocusGain::Gain))
            .unwrap();

        assert_eq!(outcome, FocusOutcome::Granted);
        let front = ClientId::new("front");
        assert_eq!(zones.zone(0).unwrap().state_of(&front), Some(EntryState::Active));
    }

    #[test]
    fn test_unknown_zone() {
        let zones = zones(vec![0]);
        let result = zones.request(7, FocusRequest::new("a", Usage::Media, FocusGain::Gain));
        assert!(matches!(result, Err(FocusError::UnknownZone(7))));
        assert_eq!(zones.zone_ids().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = FocusConfig {
            zones: vec![],
            ..FocusConfig::default()
        };
        let result = ZonesAudioFocus::from_config(
            &config,
            Arc::new(NoDuckingPermission),
            Arc::new(NullSettings),
            |_| Arc::new(NullListener),
        );
        assert!(matches!(result, Err(FocusError::Config(_))));
    }

    #[test]
    fn test_move_uid_migrates_focus() {
        let listeners: Vec<Arc<RecordingListener>> =
            vec![Arc::new(RecordingListener::new()), Arc::new(RecordingListener::new())];
        let zones = ZonesAudioFocus::from_config(
            &FocusConfig {
                zones: vec![0, 1],
                ..FocusConfig::default()
            },
            Arc::new(NoDuckingPermission),
            Arc::new(NullSettings),
            |zone| listeners[zone as usize].clone(),
        )
        .unwrap();

        let music = FocusRequest::new("music", Usage::Media, FocusGain::Gain).with_owner(10_100, "player");
        let other = FocusRequest::new("radio", Usage::Media, FocusGain::Gain).with_owner(10_200, "radio");
        zones.request(0, music).unwrap();
        zones.request(1, other).unwrap();

        let not_granted = zones.move_uid(10_100, 0, 1).unwrap();

        assert!(not_granted.is_empty());
        let music_id = ClientId::new("music");
        assert_eq!(zones.zone(0).unwrap().state_of(&music_id), None);
        assert_eq!(zones.zone(1).unwrap().state_of(&music_id), Some(EntryState::Active));
        assert_eq!(listeners[0].dispatches_for("music"), vec![FocusChange::LossTransient]);
        // The radio was playing in the new zone and loses to the arrival
        assert_eq!(listeners[1].dispatches_for("radio"), vec![FocusChange::Loss]);
        assert_eq!(listeners[1].dispatches_for("music"), vec![FocusChange::Gain]);
    }

    #[test]
    fn test_move_uid_without_focus_is_noop() {
        let zones = zones(vec![0, 1]);
        assert!(zones.move_uid(10_100, 0, 1).unwrap().is_empty());
        assert!(zones.move_uid(10_100, 0, 9).is_err());
    }
}
