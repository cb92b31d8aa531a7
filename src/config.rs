//! Application configuration.

use crate::consts::cli_consts::{fetching, refresh};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use std::{fs, path::Path};

/// Returns the location of the config file, `~/.trade-pulse/config.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home = home::home_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    Ok(home.join(".trade-pulse").join("config.json"))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Seconds between automatic refresh cycles.
    pub refresh_interval_secs: u64,
    /// Seconds a single source fetch may take before it falls back.
    pub fetch_timeout_secs: u64,
    /// ISO3 country code used by the country-scoped providers.
    pub country: String,
    /// Per-source URL overrides, keyed by source name.
    pub source_urls: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: refresh::REFRESH_INTERVAL_SECS,
            fetch_timeout_secs: fetching::FETCH_TIMEOUT_SECS,
            country: "AUS".to_string(),
            source_urls: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the config file. A missing file is not an error.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        if !path.ends_with("config.json") {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path must end with config.json",
            ));
        }
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(path)
    }

    /// Applies command-line overrides on top of the file values.
    pub fn with_overrides(mut self, interval_secs: Option<u64>, timeout_secs: Option<u64>) -> Self {
        if let Some(secs) = interval_secs {
            self.refresh_interval_secs = secs;
        }
        if let Some(secs) = timeout_secs {
            self.fetch_timeout_secs = secs;
        }
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.clamp(
            refresh::MIN_REFRESH_INTERVAL_SECS,
            refresh::MAX_REFRESH_INTERVAL_SECS,
        ))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(
            self.fetch_timeout_secs
                .clamp(1, fetching::MAX_FETCH_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    // Loading a saved configuration file should return the same configuration.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config
            .source_urls
            .insert("port".to_string(), "http://localhost:1/port".to_string());
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Saving a configuration should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("config.json");

        let result = Config::default().save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Fields missing from the file fall back to their defaults.
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"country": "NZL"}"#).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.country, "NZL");
        assert_eq!(config.refresh_interval_secs, refresh::REFRESH_INTERVAL_SECS);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_overrides_and_interval_floor() {
        let config = Config::default().with_overrides(Some(1), Some(3));
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
    }

    #[test]
    // Huge values from flags or the file are capped instead of overflowing timers.
    fn test_interval_and_timeout_ceiling() {
        let config = Config::default().with_overrides(Some(u64::MAX), Some(u64::MAX));
        assert_eq!(
            config.refresh_interval(),
            Duration::from_secs(refresh::MAX_REFRESH_INTERVAL_SECS)
        );
        assert_eq!(
            config.fetch_timeout(),
            Duration::from_secs(fetching::MAX_FETCH_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        Config::default().save(&path).unwrap();

        Config::clear(&path).unwrap();
        assert!(!path.exists());
        // Clearing again is fine.
        Config::clear(&path).unwrap();
    }
}
