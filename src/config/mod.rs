//! Configuration for badgesync
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults ([`BadgeConfig::default`])
//! 2. `badgesync.toml` in the project root, or the file given by `--config` /
//!    `BADGESYNC_CONFIG`
//! 3. Environment overrides: `BADGESYNC_API_BASE`, `BADGESYNC_DELAY_MS`,
//!    `BADGESYNC_TIMEOUT_SECS`
//!
//! # Configuration File (`badgesync.toml`)
//!
//! Every key is optional:
//!
//! ```toml
//! api_base = "https://nlp.netlearning.co.jp/api/v1.0/openbadge/v2"
//! input = "src/data/badge-urls.json"
//! cache_dir = ".cache"
//! delay_ms = 500
//! timeout_secs = 10
//! user_agent = "my-site-build/1.0"
//! placeholder_image = "https://example.com/badge-placeholder.png"
//! ```
//!
//! Relative `input` and `cache_dir` paths are resolved against the project
//! root by [`ProjectPaths`].

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{
    CACHE_FILE, CONFIG_FILE, DEFAULT_API_BASE, DEFAULT_CACHE_DIR, DEFAULT_DELAY_MS,
    DEFAULT_INPUT_PATH, DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT, META_FILE,
};
use crate::core::BadgeError;

/// Overrides `api_base`.
pub const ENV_API_BASE: &str = "BADGESYNC_API_BASE";
/// Overrides `delay_ms`.
pub const ENV_DELAY_MS: &str = "BADGESYNC_DELAY_MS";
/// Overrides `timeout_secs`.
pub const ENV_TIMEOUT_SECS: &str = "BADGESYNC_TIMEOUT_SECS";

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BadgeConfig {
    /// Base URL of the Open Badge assertion API.
    pub api_base: String,
    /// Badge list (`[{url, note}]`), relative to the project root.
    pub input: PathBuf,
    /// Cache directory, relative to the project root.
    pub cache_dir: PathBuf,
    /// Pause between two badge resolutions.
    pub delay_ms: u64,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Image used when no assertion id is available. Defaults to an API URL.
    pub placeholder_image: Option<String>,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            delay_ms: DEFAULT_DELAY_MS,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            placeholder_image: None,
        }
    }
}

impl BadgeConfig {
    /// Load configuration for the project at `root`.
    ///
    /// An explicit `config_path` must exist; the implicit `badgesync.toml` is
    /// optional. Environment overrides are applied last.
    ///
    /// # Errors
    ///
    /// [`BadgeError::ConfigError`] for unreadable or invalid files and for
    /// malformed environment overrides.
    pub async fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from(path).await?,
            None => {
                let path = root.join(CONFIG_FILE);
                if path.exists() {
                    Self::load_from(&path).await?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = tokio::fs::read_to_string(path).await.map_err(|e| BadgeError::ConfigError {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        let config = Self::from_toml(&content).map_err(|e| BadgeError::ConfigError {
            message: format!("{}: {e}", path.display()),
        })?;
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), BadgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = lookup(ENV_API_BASE) {
            self.api_base = api_base;
        }
        if let Some(delay) = lookup(ENV_DELAY_MS) {
            self.delay_ms = parse_number(ENV_DELAY_MS, &delay)?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_number(ENV_TIMEOUT_SECS, &timeout)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), BadgeError> {
        if self.api_base.trim().is_empty() {
            return Err(BadgeError::ConfigError {
                message: "api_base must not be empty".to_string(),
            });
        }
        if self.placeholder_image.as_deref().is_some_and(|image| image.trim().is_empty()) {
            return Err(BadgeError::ConfigError {
                message: "placeholder_image must not be empty".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(BadgeError::ConfigError {
                message: "timeout_secs must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, BadgeError> {
    value.trim().parse().map_err(|_| BadgeError::ConfigError {
        message: format!("{key} must be a non-negative integer, got {value:?}"),
    })
}

/// Absolute locations of the files badgesync touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub input: PathBuf,
    pub cache_dir: PathBuf,
    pub cache_file: PathBuf,
    pub meta_file: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: &Path, config: &BadgeConfig) -> Self {
        let cache_dir = root.join(&config.cache_dir);
        Self {
            root: root.to_path_buf(),
            input: root.join(&config.input),
            cache_file: cache_dir.join(CACHE_FILE),
            meta_file: cache_dir.join(META_FILE),
            cache_dir,
        }
    }
}
