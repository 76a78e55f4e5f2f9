//! Domain layer for Pomodorable.
//!
//! This crate holds the pieces the rest of the workspace builds on: the
//! session document model and its partial-update type, the store and auth
//! contracts, the countdown state machine, the error taxonomy, and the
//! configuration types.

pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod timer;

// Re-export common error type
pub use error::{PomodorableError, Result};
