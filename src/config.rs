use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{MatchdeckError, Result};

const LOG_PREFIX: &str = "[config]";

pub const CONFIG_DIR_NAME: &str = "matchdeck";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const API_URL_ENV: &str = "MATCHDECK_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/";
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 300;
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client settings, persisted as TOML.
///
/// Every field has a default, so a partial file (or no file at all)
/// is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the profile backend
    pub api_url: Url,
    /// Pause between recognizing a gesture and committing the cursor
    pub settle_delay_ms: u64,
    /// Minimal horizontal travel, in pixels, for a swipe to count
    pub swipe_threshold: f32,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL)
                .expect("default api url is valid"),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Platform config location:
    /// `$XDG_CONFIG_HOME/matchdeck/config.toml`, or
    /// `$HOME/.config/matchdeck/config.toml` when XDG_CONFIG_HOME is not set.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME")
        {
            PathBuf::from(xdg_config_home)
        } else if let Ok(home) = env::var("HOME") {
            PathBuf::from(home).join(".config")
        } else {
            return Err(MatchdeckError::Config(
                "unable to determine config directory (missing XDG_CONFIG_HOME/HOME)"
                    .to_owned(),
            ));
        };
        Ok(config_dir
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// Load the configuration from `path`, or from [`Self::default_path`]
    /// when no path is given. A missing file yields the defaults.
    /// The `MATCHDECK_API_URL` environment variable overrides `api_url`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = if path.exists() {
            log::info!("{} reading {}", LOG_PREFIX, path.display());
            Self::from_toml(&fs::read_to_string(&path)?)?
        } else {
            log::debug!(
                "{} {} not found, using defaults",
                LOG_PREFIX,
                path.display()
            );
            Self::default()
        };

        if let Ok(api_url) = env::var(API_URL_ENV) {
            log::debug!("{} {} overrides api_url", LOG_PREFIX, API_URL_ENV);
            config.api_url = Url::parse(&api_url)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| MatchdeckError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        match self.api_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(MatchdeckError::Config(format!(
                    "api_url must be http or https, got {other}"
                )))
            }
        }
        if !self.swipe_threshold.is_finite() || self.swipe_threshold < 0.0 {
            return Err(MatchdeckError::Config(format!(
                "swipe_threshold must be a non-negative number, got {}",
                self.swipe_threshold
            )));
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
