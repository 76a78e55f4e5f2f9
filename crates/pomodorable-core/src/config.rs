//! Application configuration types.

use serde::{Deserialize, Serialize};

/// Timer and synchronizer tunables.
///
/// Loaded from the user's config file by the infrastructure layer; every
/// field has a default so a missing or partial file is never an error.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Work phase length in seconds (25 minutes)
    pub work_duration_secs: u32,
    /// Break phase length in seconds (5 minutes)
    pub break_duration_secs: u32,
    /// Trailing-edge debounce window for goals auto-save, in milliseconds
    pub goals_debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            work_duration_secs: 25 * 60,
            break_duration_secs: 5 * 60,
            goals_debounce_ms: 1500,
        }
    }
}
