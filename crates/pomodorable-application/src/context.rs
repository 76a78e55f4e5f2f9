//! Application context.
//!
//! One explicit object, constructed at startup, carrying the store and
//! auth adapters plus the loaded configuration. Everything downstream
//! receives it by injection; nothing reaches for ambient globals.

use pomodorable_core::auth::{AuthProvider, AuthUser};
use pomodorable_core::config::AppConfig;
use pomodorable_core::session::SessionStore;
use pomodorable_infrastructure::{LocalAuthProvider, MemorySessionStore};
use std::sync::Arc;

/// Shared dependencies for the application layer.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn SessionStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub config: AppConfig,
}

impl AppContext {
    /// Creates a context from explicit adapters.
    pub fn new(store: Arc<dyn SessionStore>, auth: Arc<dyn AuthProvider>, config: AppConfig) -> Self {
        Self {
            store,
            auth,
            config,
        }
    }

    /// Creates a fully local context: in-memory store, the given user
    /// already signed in, default configuration.
    pub fn local(user: AuthUser) -> Self {
        Self::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(LocalAuthProvider::signed_in(user)),
            AppConfig::default(),
        )
    }
}
