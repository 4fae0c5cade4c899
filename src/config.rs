//! Configuration for the listings client.
//!
//! The RapidAPI credential is injected by the environment
//! (`BAYUT_API_KEY`, optionally `BAYUT_AGENCIES_API_KEY` for the agency
//! host) or read from `config.yaml` in the user config directory. The
//! key is never embedded in the binary.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{BayutError, Result};
use crate::fetch::debounce::DEFAULT_DEBOUNCE_MS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Key for the property endpoints host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Key for the agency endpoints host; the property key is reused
    /// when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agencies_api_key: Option<String>,

    /// Quiet interval for search-as-you-type, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
}

impl Config {
    /// Path to the config file in the user config directory.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "bayut-client").ok_or_else(|| {
            BayutError::Config("could not determine config directory".to_string())
        })?;
        Ok(dirs.config_dir().join("config.yaml"))
    }

    /// Load configuration from the default location, or return defaults
    /// if no file exists.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Property-host API key from the environment or the config file.
    pub fn bayut_api_key(&self) -> Option<String> {
        if let Ok(key) = env::var("BAYUT_API_KEY")
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Agency-host API key from the environment or the config file.
    pub fn agencies_api_key(&self) -> Option<String> {
        if let Ok(key) = env::var("BAYUT_AGENCIES_API_KEY")
            && !key.is_empty()
        {
            return Some(key);
        }
        self.agencies_api_key.clone()
    }

    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key);
    }

    pub fn set_agencies_api_key(&mut self, key: String) {
        self.agencies_api_key = Some(key);
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(config.agencies_api_key.is_none());
        assert_eq!(config.debounce_ms(), DEFAULT_DEBOUNCE_MS);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.set_api_key("rapid-test-key".to_string());
        config.debounce_ms = Some(250);

        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let parsed: Config = serde_yaml_ng::from_str(&yaml).unwrap();

        assert_eq!(parsed.api_key, Some("rapid-test-key".to_string()));
        assert_eq!(parsed.debounce_ms(), 250);
        // Unset keys are omitted from the file entirely.
        assert!(!yaml.contains("agencies_api_key"));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.yaml")).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.set_api_key("k1".to_string());
        config.set_agencies_api_key("k2".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key, Some("k1".to_string()));
        assert_eq!(loaded.agencies_api_key, Some("k2".to_string()));
    }
}
