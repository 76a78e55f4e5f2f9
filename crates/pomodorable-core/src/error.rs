//! Error types for the Pomodorable application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Pomodorable application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
///
/// The variants fall into two recovery classes:
/// - Navigation errors (`AuthRequired`, `AccessDenied`, `NotFound`): the
///   caller should leave the current screen; these are never retried.
/// - Notification errors (everything else): surfaced to the user, and the
///   triggering control stays enabled for a manual retry. No layer below
///   the UI retries automatically.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PomodorableError {
    /// Operation attempted without an authenticated owner
    #[error("Authentication required")]
    AuthRequired,

    /// The fetched session belongs to a different user
    #[error("Access denied to session '{session_id}'")]
    AccessDenied { session_id: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The persistence dependency failed to initialize or is unreachable
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A query requires a composite index that has not been provisioned.
    ///
    /// `fields` carries the exact field tuple to provision, in order, so the
    /// UI can show actionable remediation instead of a generic failure.
    #[error("Query requires a composite index on ({})", .fields.join(", "))]
    MissingIndex { fields: Vec<String> },

    /// A create/update call rejected by the store for any other reason
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// Mutation attempted on a completed (terminal, read-only) session
    #[error("Session '{session_id}' is completed and read-only")]
    SessionCompleted { session_id: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PomodorableError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an AccessDenied error
    pub fn access_denied(session_id: impl Into<String>) -> Self {
        Self::AccessDenied {
            session_id: session_id.into(),
        }
    }

    /// Creates a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates a MissingIndex error from the required field tuple
    pub fn missing_index(fields: &[&str]) -> Self {
        Self::MissingIndex {
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Creates a WriteFailed error
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::WriteFailed(message.into())
    }

    /// Creates a SessionCompleted error
    pub fn session_completed(session_id: impl Into<String>) -> Self {
        Self::SessionCompleted {
            session_id: session_id.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Classification methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a MissingIndex error
    pub fn is_missing_index(&self) -> bool {
        matches!(self, Self::MissingIndex { .. })
    }

    /// Whether the caller should navigate away rather than show a
    /// notification (auth / access / not-found cases).
    pub fn requires_redirect(&self) -> bool {
        matches!(
            self,
            Self::AuthRequired | Self::AccessDenied { .. } | Self::NotFound { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PomodorableError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PomodorableError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PomodorableError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PomodorableError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PomodorableError>`.
pub type Result<T> = std::result::Result<T, PomodorableError>;
