//! Filesystem locations for Pomodorable.

use pomodorable_core::error::{PomodorableError, Result};
use std::path::PathBuf;

/// Resolves the application's well-known paths.
pub struct PomodorablePaths;

impl PomodorablePaths {
    /// The configuration directory (`~/.config/pomodorable` on Linux).
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the platform config directory cannot be
    /// determined.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("pomodorable"))
            .ok_or_else(|| PomodorableError::config("could not determine config directory"))
    }

    /// The configuration file path.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
