//! Loading and saving the application configuration.

use crate::paths::PomodorablePaths;
use pomodorable_core::config::AppConfig;
use pomodorable_core::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Reads and writes the TOML configuration file.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a service for an explicit config file path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a service at the default location
    /// (`~/.config/pomodorable/config.toml`).
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the config directory cannot be
    /// determined.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(PomodorablePaths::config_file()?))
    }

    /// Loads the configuration, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an `Io` error for unreadable files and a `Serialization`
    /// error for unparseable ones; an absent file is not an error.
    pub async fn load(&self) -> Result<AppConfig> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let config = toml::from_str(&contents)?;
                tracing::debug!(path = %self.path.display(), "Loaded configuration");
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No config file, using defaults");
                Ok(AppConfig::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Saves the configuration, creating parent directories as needed.
    pub async fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.path, contents).await?;
        tracing::debug!(path = %self.path.display(), "Saved configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(dir.path().join("config.toml"));
        let config = service.load().await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(dir.path().join("nested").join("config.toml"));

        let config = AppConfig {
            work_duration_secs: 600,
            break_duration_secs: 120,
            goals_debounce_ms: 500,
        };
        service.save(&config).await.unwrap();
        assert_eq!(service.load().await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_invalid_toml_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "work_duration_secs = \"not a number\"")
            .await
            .unwrap();

        let err = ConfigService::new(&path).load().await.unwrap_err();
        assert!(matches!(
            err,
            pomodorable_core::PomodorableError::Serialization { .. }
        ));
    }
}
