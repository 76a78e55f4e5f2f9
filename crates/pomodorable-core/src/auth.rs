//! Authentication provider contract.
//!
//! The identity provider is an external collaborator; the core only needs
//! the authenticated user's unique identifier, which becomes the owner of
//! every session that user creates.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The authenticated user as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Unique identifier assigned by the identity provider; used as the
    /// `owner_id` of created sessions.
    pub uid: String,
    /// Display name, if the provider supplies one
    pub display_name: Option<String>,
}

impl AuthUser {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
        }
    }
}

/// An abstract identity provider.
///
/// Implementations wrap a concrete provider (sign-in popup, token refresh,
/// etc.); none of that protocol surfaces here. Auth state changes are
/// delivered through a `watch` channel so callers can react to sign-out
/// without polling.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Signs the user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` if the provider rejects the attempt.
    async fn sign_in(&self) -> Result<AuthUser>;

    /// Signs the current user out. A no-op when nobody is signed in.
    async fn sign_out(&self);

    /// Returns the currently authenticated user, if any.
    fn current_user(&self) -> Option<AuthUser>;

    /// Returns a receiver that observes every auth state change,
    /// delivering the new current user (or `None` on sign-out).
    fn watch(&self) -> watch::Receiver<Option<AuthUser>>;
}
