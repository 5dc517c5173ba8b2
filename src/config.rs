//! Configuration management
//!
//! Settings are layered: `config/default.toml`, then `config/<env>.toml`,
//! then `STOREFRONT_*` environment variables. Nested keys use a double
//! underscore, e.g. `STOREFRONT_TIMEOUTS__DEFAULT_MS=5000`.

use crate::data::UserProfile;
use crate::interaction::RetryPolicy;
use crate::wait::Timeouts;
use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming the config environment
pub const ENV_SELECTOR: &str = "STOREFRONT_ENV";

/// Directory holding the layered config files
pub const CONFIG_DIR: &str = "config";

/// Wait settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Locator wait timeout in milliseconds
    pub default_ms: u64,
    /// Poll interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            default_ms: 10_000,
            poll_interval_ms: 250,
        }
    }
}

/// Click retry settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrySettings {
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            retries: 2,
            backoff_ms: 500,
        }
    }
}

/// Framework configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storefront root URL
    pub base_url: String,

    /// Browser name, informational for the CDP backend
    pub browser: String,

    /// Whether the browser was started headless
    pub headless: bool,

    /// Chrome remote debugging endpoint
    pub cdp_endpoint: String,

    /// Log level
    pub log_level: String,

    /// Directory for the rotating debug log; empty disables it
    pub log_dir: String,

    /// Where diagnostic snapshots are written
    pub artifacts_dir: String,

    /// Where the browser saves downloads
    pub downloads_dir: String,

    pub timeouts: TimeoutSettings,

    pub retry: RetrySettings,

    /// Profile used by the registration flow
    pub user_profile: UserProfile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://automationexercise.com".to_string(),
            browser: "chrome".to_string(),
            headless: true,
            cdp_endpoint: "http://127.0.0.1:9222".to_string(),
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
            artifacts_dir: "artifacts".to_string(),
            downloads_dir: "downloads".to_string(),
            timeouts: TimeoutSettings::default(),
            retry: RetrySettings::default(),
            user_profile: UserProfile::default(),
        }
    }
}

impl Config {
    /// Load the layered configuration for the environment named by
    /// `STOREFRONT_ENV` (default `dev`)
    pub fn load() -> Result<Self> {
        let environment = env::var(ENV_SELECTOR)
            .map(|v| v.to_lowercase())
            .unwrap_or_else(|_| "dev".to_string());
        Self::load_env(&environment)
    }

    /// Load the layered configuration for `environment`
    pub fn load_env(environment: &str) -> Result<Self> {
        Self::load_from(Path::new(CONFIG_DIR), environment)
    }

    /// Load the layered configuration from `dir`
    pub fn load_from(dir: &Path, environment: &str) -> Result<Self> {
        let base = dir.join("default.toml");
        let overlay = dir.join(format!("{}.toml", environment));
        info!("Loading configuration (env={})", environment);

        if !overlay.exists() {
            warn!(
                "Environment config {} not found, using base config only",
                overlay.display()
            );
        }

        let layered = ::config::Config::builder()
            .add_source(::config::File::from(base).required(false))
            .add_source(::config::File::from(overlay).required(false))
            .add_source(
                ::config::Environment::with_prefix("STOREFRONT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build config: {}", e)))?;

        let config: Config = layered
            .try_deserialize()
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::configuration("base_url must not be empty"));
        }
        if self.timeouts.poll_interval_ms == 0 {
            return Err(Error::configuration("timeouts.poll_interval_ms must be positive"));
        }
        Ok(())
    }

    /// Wait settings as used by the interaction layer
    pub fn wait_timeouts(&self) -> Timeouts {
        Timeouts::new(
            Duration::from_millis(self.timeouts.default_ms),
            Duration::from_millis(self.timeouts.poll_interval_ms),
        )
    }

    /// Click retry policy as used by the interaction layer
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry.retries, Duration::from_millis(self.retry.backoff_ms))
    }
}
