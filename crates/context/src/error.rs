//! Error types for context lookups.

use crate::context::AudioContext;
use thiserror::Error;

/// Result type for context operations.
pub type Result<T> = std::result::Result<T, ContextError>;

/// Errors raised by the usage taxonomy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The context has no usages (only the `Invalid` sentinel).
    #[error("invalid audio context: {0}")]
    InvalidContext(AudioContext),
}
