//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the discovered backend origin and the last used email.
//!
//! The backend origin is not hardcoded: it is discovered out-of-band at
//! first launch, written here, and resolved into a value before any API
//! client is constructed. Configuration is stored at
//! `~/.config/divvy/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "divvy";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Discovered backend origin, e.g. `https://api.divvy.example`
    pub backend_origin: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The effective backend origin, or an error when none has been
    /// discovered yet. Resolve this once at startup and inject the value.
    pub fn resolve_origin(&self) -> Result<String> {
        self.backend_origin
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No backend origin configured"))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the session store and entity cache
    pub fn data_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let config = Config::load_from(&path).expect("load");
        assert!(config.backend_origin.is_none());
        assert!(config.resolve_origin().is_err());
    }

    #[test]
    fn test_round_trip_preserves_origin() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let config = Config {
            backend_origin: Some("https://api.divvy.example".into()),
            last_email: Some("asha@example.com".into()),
        };
        config.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(
            loaded.resolve_origin().expect("origin"),
            "https://api.divvy.example"
        );
        assert_eq!(loaded.last_email.as_deref(), Some("asha@example.com"));
    }
}
