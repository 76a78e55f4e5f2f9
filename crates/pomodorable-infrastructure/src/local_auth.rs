//! Single-user [`AuthProvider`] implementation.
//!
//! Stands in for the hosted identity provider: one configured identity,
//! sign-in/sign-out flips a watch channel that mirrors the provider's
//! auth-state-change callback.

use async_trait::async_trait;
use pomodorable_core::auth::{AuthProvider, AuthUser};
use pomodorable_core::error::{PomodorableError, Result};
use tokio::sync::watch;

/// Auth provider backed by a single configured user.
pub struct LocalAuthProvider {
    user: AuthUser,
    state: watch::Sender<Option<AuthUser>>,
}

impl LocalAuthProvider {
    /// Creates a provider for `user`, starting signed out.
    pub fn new(user: AuthUser) -> Self {
        let (state, _rx) = watch::channel(None);
        Self { user, state }
    }

    /// Creates a provider for `user`, already signed in.
    pub fn signed_in(user: AuthUser) -> Self {
        let (state, _rx) = watch::channel(Some(user.clone()));
        Self { user, state }
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_in(&self) -> Result<AuthUser> {
        if self.user.uid.is_empty() {
            return Err(PomodorableError::AuthRequired);
        }
        tracing::info!(uid = %self.user.uid, "User signed in");
        self.state.send_replace(Some(self.user.clone()));
        Ok(self.user.clone())
    }

    async fn sign_out(&self) {
        tracing::info!(uid = %self.user.uid, "User signed out");
        self.state.send_replace(None);
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<Option<AuthUser>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let provider = LocalAuthProvider::new(AuthUser::new("u1"));
        assert!(provider.current_user().is_none());

        let user = provider.sign_in().await.unwrap();
        assert_eq!(user.uid, "u1");
        assert_eq!(provider.current_user().unwrap().uid, "u1");

        provider.sign_out().await;
        assert!(provider.current_user().is_none());
    }

    #[tokio::test]
    async fn test_watch_delivers_state_changes() {
        let provider = LocalAuthProvider::new(AuthUser::new("u1"));
        let mut rx = provider.watch();

        provider.sign_in().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        provider.sign_out().await;
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn test_signed_in_constructor() {
        let provider = LocalAuthProvider::signed_in(AuthUser::new("u1"));
        assert!(provider.current_user().is_some());
    }
}
