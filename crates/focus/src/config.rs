//! Focus engine configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Zone every configuration has unless told otherwise.
pub const PRIMARY_ZONE_ID: u32 = 0;

/// Configuration for the focus engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Whether requests may be parked for a deferred grant.
    pub delayed_focus_enabled: bool,
    /// Audio zones, each with its own focus stack.
    pub zones: Vec<u32>,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            delayed_focus_enabled: true,
            zones: vec![PRIMARY_ZONE_ID],
        }
    }
}

impl FocusConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: FocusConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading focus config");
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zones.is_empty() {
            return Err(ConfigError::NoZones);
        }
        let mut seen = HashSet::new();
        for &zone in &self.zones {
            if !seen.insert(zone) {
                return Err(ConfigError::DuplicateZone(zone));
            }
        }
        Ok(())
    }
}
