//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable overrides
//! for deployment secrets like `DISCORD_WEBHOOK_URL`.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

use crate::application::BusConfig;
use crate::domain::Priority;
use crate::error::{ConfigError, Result};

const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub bus: BusAppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub discord: DiscordAppConfig,
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
}

/// Where the ingestion API listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusAppConfig {
    /// Per-listener delivery timeout in seconds. 0 disables the timeout.
    #[serde(default = "default_delivery_timeout_secs")]
    pub delivery_timeout_secs: u64,
}

const fn default_delivery_timeout_secs() -> u64 {
    10
}

impl Default for BusAppConfig {
    fn default() -> Self {
        Self {
            delivery_timeout_secs: default_delivery_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Terminal notifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Discord webhook notifier. Disabled while `webhook_url` is unset.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordAppConfig {
    /// Overridden by `DISCORD_WEBHOOK_URL`.
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_discord_username")]
    pub username: String,
    /// Total attempts per notification.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Event types to forward. Empty forwards everything.
    #[serde(default)]
    pub event_types: Vec<String>,
    /// Drop events below this priority.
    #[serde(default = "default_min_priority")]
    pub min_priority: Priority,
}

fn default_discord_username() -> String {
    "Crypto Alert Bot".to_string()
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_min_priority() -> Priority {
    Priority::Low
}

impl Default for DiscordAppConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            username: default_discord_username(),
            max_retries: default_max_retries(),
            event_types: Vec::new(),
            min_priority: default_min_priority(),
        }
    }
}

/// Uptime heartbeat. Disabled while `url` is unset.
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatConfig {
    /// Overridden by `HEARTBEAT_URL`.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_heartbeat_interval_secs")]
    pub interval_secs: u64,
}

const fn default_heartbeat_interval_secs() -> u64 {
    30
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            url: None,
            interval_secs: default_heartbeat_interval_secs(),
        }
    }
}

impl Config {
    /// Load, apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or if validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults plus
    /// environment overrides.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }

        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text, apply environment overrides and validate.
    #[allow(clippy::result_large_err)]
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Overlay `DISCORD_WEBHOOK_URL`, `HEARTBEAT_URL` and `LOG_LEVEL`.
    /// Unset or blank variables leave the file value alone.
    pub fn apply_env(&mut self) {
        if let Some(url) = non_empty_env("DISCORD_WEBHOOK_URL") {
            self.discord.webhook_url = Some(url);
        }
        if let Some(url) = non_empty_env("HEARTBEAT_URL") {
            self.heartbeat.url = Some(url);
        }
        if let Some(level) = non_empty_env("LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "server.host",
            }
            .into());
        }
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port",
                reason: "must be non-zero".to_string(),
            }
            .into());
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!(
                    "expected one of {}, got '{}'",
                    LOG_FORMATS.join(", "),
                    self.logging.format
                ),
            }
            .into());
        }
        if let Some(url) = &self.discord.webhook_url {
            validate_http_url("discord.webhook_url", url)?;
        }
        if self.discord.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "discord.max_retries",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if let Some(url) = &self.heartbeat.url {
            validate_http_url("heartbeat.url", url)?;
        }
        if self.heartbeat.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "heartbeat.interval_secs",
                reason: "must be non-zero".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Bus tuning derived from `[bus]`.
    #[must_use]
    pub fn bus_config(&self) -> BusConfig {
        BusConfig {
            delivery_timeout: match self.bus.delivery_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }

    /// Initialize logging with the configured settings.
    ///
    /// `RUST_LOG` takes precedence over `[logging] level`.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[allow(clippy::result_large_err)]
fn validate_http_url(field: &'static str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        }
        .into());
    }
    Ok(())
}
