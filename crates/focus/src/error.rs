//! Error types for focus arbitration.
//!
//! Policy outcomes (failed or delayed requests) are not errors; they are
//! reported as [`crate::FocusOutcome`] values. Errors here are integration
//! bugs or host misconfiguration.

use gainkeeper_context::AudioContext;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for focus operations.
pub type Result<T> = std::result::Result<T, FocusError>;

/// Errors raised by the focus engine.
#[derive(Debug, Error)]
pub enum FocusError {
    /// An unresolved context reached the interaction matrix.
    #[error("invalid audio context in interaction: {0}")]
    InvalidContext(AudioContext),

    /// The zone id is not configured.
    #[error("unknown audio zone {0}")]
    UnknownZone(u32),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that can occur while loading focus configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid JSON for [`crate::FocusConfig`].
    #[error("invalid focus config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config declares no zones.
    #[error("focus config must declare at least one zone")]
    NoZones,

    /// The same zone id appears twice.
    #[error("duplicate zone id {0} in focus config")]
    DuplicateZone(u32),
}
