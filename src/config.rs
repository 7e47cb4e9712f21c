//! Configuration loader/writer plus strongly typed settings structures.
//!
//! Settings live in `~/.smarttools/config.toml` (missing file means defaults).
//! The same directory holds the preferences file, the log, the contact outbox
//! and, when no downloads folder exists, downloaded results.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "SMARTTOOLS_DIR";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub downloads: DownloadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll timeout; also bounds how stale a redraw can be
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    /// Seconds a footer status message stays visible
    #[serde(default = "default_status_seconds")]
    pub status_seconds: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout_ms(),
            status_seconds: default_status_seconds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// JSON endpoint answering `{"ip": "..."}`
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ip_lookup_url: default_ip_lookup_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Where downloaded results are written (default: the OS downloads folder)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

fn default_poll_timeout_ms() -> u64 {
    100
}

fn default_status_seconds() -> u64 {
    4
}

fn default_ip_lookup_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load `config.toml` from the data directory, or defaults if absent
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            tracing::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Base data directory (~/.smarttools/)
    /// Can be overridden with the SMARTTOOLS_DIR environment variable
    pub fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
            return Ok(PathBuf::from(custom_dir));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".smarttools"))
    }

    /// Returns: ~/.smarttools/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }

    /// Returns: ~/.smarttools/prefs.toml
    pub fn prefs_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("prefs.toml"))
    }

    /// Returns: ~/.smarttools/smarttools.log
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("smarttools.log"))
    }

    /// Returns: ~/.smarttools/contact-outbox.jsonl
    pub fn outbox_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("contact-outbox.jsonl"))
    }

    /// Configured downloads folder, else the OS one, else ~/.smarttools/downloads
    pub fn downloads_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.downloads.directory {
            return Ok(dir.clone());
        }
        if let Some(dir) = dirs::download_dir() {
            return Ok(dir);
        }
        Ok(Self::base_dir()?.join("downloads"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.ui.poll_timeout_ms, 100);
        assert_eq!(config.network.ip_lookup_url, "https://api.ipify.org?format=json");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [network]
            ip_lookup_url = "http://localhost:9/ip"

            [downloads]
            directory = "/tmp/out"
            "#,
        )
        .unwrap();
        assert_eq!(config.network.ip_lookup_url, "http://localhost:9/ip");
        assert_eq!(config.network.request_timeout_secs, 10);
        assert_eq!(config.ui, UiConfig::default());
        assert_eq!(config.downloads_dir().unwrap(), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_load_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[ui\npoll_timeout_ms = ").unwrap();
        assert!(Config::load_from_file(&path).is_err());
    }
}
