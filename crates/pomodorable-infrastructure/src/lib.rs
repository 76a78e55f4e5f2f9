//! Infrastructure adapters for Pomodorable.
//!
//! Concrete implementations of the core's store and auth contracts, plus
//! configuration loading and filesystem paths.

pub mod config_service;
pub mod local_auth;
pub mod memory_store;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::local_auth::LocalAuthProvider;
pub use crate::memory_store::MemorySessionStore;
