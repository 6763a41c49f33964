//! Configuration management for Briefing.
//!
//! Sources and settings are read from `~/.config/briefing/feeds.json` (or a
//! path given on the command line). A `.toml` file is accepted as well.
//! If the file doesn't exist, the default configuration is used.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{CalendarSource, FeedSource};

const DEFAULT_CACHE_TTL_SECS: u64 = 900;
const DEFAULT_MAX_ITEMS_PER_FEED: usize = 20;
const DEFAULT_PORT: u16 = 3001;

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feeds: Vec<FeedSource>,
    pub settings: Settings,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Feed cache lifetime in seconds.
    #[serde(rename = "cacheTTL")]
    pub cache_ttl: u64,
    pub max_items_per_feed: usize,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
            max_items_per_feed: DEFAULT_MAX_ITEMS_PER_FEED,
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub sources: Vec<CalendarSource>,
    #[serde(rename = "cacheTTL")]
    pub cache_ttl: u64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// A missing file yields the default configuration. Missing fields in
    /// an existing file use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            tracing::debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::parse(&config_path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            toml::from_str(content).map_err(|e| ConfigError::Toml {
                path: path.to_path_buf(),
                source: e,
            })
        } else {
            serde_json::from_str(content).map_err(|e| ConfigError::Json {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    /// Get the default config file path: `~/.config/briefing/feeds.json`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("briefing").join("feeds.json"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}
