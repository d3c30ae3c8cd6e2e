//! Error types for flocksim.
//!
//! The simulation itself never fails: out-of-volume agents, coincident
//! positions and empty neighborhoods are all handled inside a tick. Errors
//! only come from the configuration boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`FlockConfig`](crate::FlockConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value the simulation cannot run with.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Failed to read or write a config file.
    #[error("failed to access config file {path}: {source}")]
    Io {
        /// File that could not be accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for a [`FlockConfig`](crate::FlockConfig).
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// An appearance name that matches no [`Appearance`](crate::Appearance) variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown appearance `{0}` (expected one of: default, reds, greens, blues, yellows, cyans, magentas, rainbow)")]
pub struct ParseAppearanceError(pub String);
