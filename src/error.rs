// SPDX-License-Identifier: MIT

//! Typed error handling for plexus-rs
//!
//! One top-level enum covers the three failure classes the core can
//! produce: record construction, command delegation and event
//! deserialization. The core performs no retries and no recovery;
//! every error propagates to the caller unchanged.

use thiserror::Error;

/// Top-level error type for plexus-rs
#[derive(Debug, Error)]
pub enum PlexusError {
    /// Invalid or missing execution context at record creation
    #[error("construction error: {0}")]
    Construction(String),

    /// Failure raised by a command delegate
    #[error("command '{command}' failed: {message}")]
    Delegation { command: String, message: String },

    /// Unknown event tag, malformed summary map, or an attempted full
    /// reconstruction from a lossy base-level summary
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PlexusError {
    /// Create a construction error
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }

    /// Create a delegation error for the named command
    pub fn delegation(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delegation {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a deserialization error
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization(message.into())
    }
}
