use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://openexchangerates.org/api/latest.json?app_id=";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_cache_duration_secs() -> u64 {
    7200
}

fn default_refresh_interval_secs() -> u64 {
    7200
}

fn default_timezone() -> String {
    "Asia/Shanghai".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    /// Prefix that the credential is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub app_ids: Vec<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    #[serde(default = "default_cache_duration_secs")]
    pub cache_duration_secs: u64,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "xrate", "xrate")
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
        if self.provider.app_ids.is_empty() {
            bail!("provider.app_ids must list at least one credential");
        }
        if self.provider.request_timeout_secs == 0 {
            bail!("provider.request_timeout_secs must be greater than zero");
        }
        if self.refresh_interval_secs == 0 {
            bail!("refresh_interval_secs must be greater than zero");
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", self.timezone, e))
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.request_timeout_secs)
    }
}
