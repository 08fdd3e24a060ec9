//! Configuration file handling
//!
//! Loaded from an explicit path or `~/.rusty-fx/config.toml`. Missing fields
//! take their defaults; an unreadable or invalid file falls back to the
//! default configuration with a warning.

use crate::error::{FxError, Result};
use crate::rates::DEFAULT_RATES_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Key-value backend used for the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key under `data_dir`
    File,
    /// `history.db` under `data_dir`
    Sqlite,
}

impl Default for StorageBackend {
    fn default() -> Self {
        if cfg!(feature = "rusqlite-support") {
            StorageBackend::Sqlite
        } else {
            StorageBackend::File
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_rates_url")]
    pub rates_url: String,
    #[serde(default = "default_from")]
    pub default_from: String,
    #[serde(default = "default_to")]
    pub default_to: String,
    #[serde(default)]
    pub storage: StorageBackend,
    /// No timeout beyond the HTTP client's own when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rusty-fx")
}

fn default_data_dir() -> PathBuf {
    app_dir().join("data")
}

fn default_rates_url() -> String {
    DEFAULT_RATES_URL.to_string()
}

fn default_from() -> String {
    "USD".to_string()
}

fn default_to() -> String {
    "EUR".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rates_url: default_rates_url(),
            default_from: default_from(),
            default_to: default_to(),
            storage: StorageBackend::default(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        app_dir().join("config.toml")
    }

    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| FxError::ConfigError(e.to_string()))
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load `path`, or the default location when `None`; falls back to defaults
    pub fn load(path: Option<&Path>) -> Self {
        let explicit = path.is_some();
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if !path.exists() {
            if explicit {
                log::warn!("Config file {} not found, using defaults", path.display());
            }
            return Config::default();
        }

        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Request timeout for the rate service, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Directory of the file store
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    /// Path of the SQLite database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("history.db")
    }

    /// Create the data directory
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }
}
