use crate::core::form::MissingRatePolicy;
use crate::core::poller::DEFAULT_REFRESH_INTERVAL;
use crate::core::schema::DEFAULT_SOURCE_TOKEN;
use crate::core::swap::{DEFAULT_SWAP_DELAY, DEFAULT_SWAP_TIMEOUT};
use crate::providers::switcheo::DEFAULT_BASE_URL;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_ICON_BASE_URL: &str =
    "https://raw.githubusercontent.com/Switcheo/token-icons/main/tokens";

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub refresh_interval_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct IconConfig {
    pub base_url: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig {
            base_url: DEFAULT_ICON_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SwapConfig {
    pub delay_ms: u64,
    pub timeout_ms: u64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        SwapConfig {
            delay_ms: DEFAULT_SWAP_DELAY.as_millis() as u64,
            timeout_ms: DEFAULT_SWAP_TIMEOUT.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub icons: IconConfig,
    pub default_source_token: String,
    pub swap: SwapConfig,
    pub missing_rate_policy: MissingRatePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            feed: FeedConfig::default(),
            icons: IconConfig::default(),
            default_source_token: DEFAULT_SOURCE_TOKEN.to_string(),
            swap: SwapConfig::default(),
            missing_rate_policy: MissingRatePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or the built-in defaults
    /// when no file exists there.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "fxswap", "fxswap")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feed.refresh_interval_ms == 0 {
            bail!("refresh_interval_ms must be positive");
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.feed.refresh_interval_ms)
    }

    pub fn swap_delay(&self) -> Duration {
        Duration::from_millis(self.swap.delay_ms)
    }

    pub fn swap_timeout(&self) -> Duration {
        Duration::from_millis(self.swap.timeout_ms)
    }
}
