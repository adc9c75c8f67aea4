//! Configuration management for the area weather service
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `AREA_WEATHER_` environment variables.

use crate::error::ConfigError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "AREA_WEATHER";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub areas: AreasConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the `/weather` endpoint is served on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Maximum accepted request body size
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Area code table location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreasConfig {
    /// Path of the `name = code` table, read on every lookup
    #[serde(default = "default_table_path")]
    pub table_path: PathBuf,
}

/// Upstream weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Page URL prefix; the area code is appended as the last path segment
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Appended directly after the area code
    #[serde(default = "default_page_suffix")]
    pub page_suffix: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_body_limit() -> usize {
    64 * 1024
}

fn default_table_path() -> PathBuf {
    PathBuf::from("tqdm.txt")
}

fn default_base_url() -> String {
    "http://www.weather.com.cn/weather1d".to_string()
}

fn default_page_suffix() -> String {
    ".shtml".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("area-weather/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for AreasConfig {
    fn default() -> Self {
        Self {
            table_path: default_table_path(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_suffix: default_page_suffix(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ProviderConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl ServerConfig {
    /// Parse the configured listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr.parse().map_err(|_| {
            ConfigError::invalid(format!(
                "Invalid listen address '{}'. Expected host:port",
                self.listen_addr
            ))
        })
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(None)
    }

    /// Load configuration from the given file, falling back to `config.toml`
    pub fn load_from_path(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        match config_path {
            // An explicitly requested file must exist
            Some(path) => {
                builder = builder.add_source(
                    File::from(path)
                        .required(true)
                        .format(config::FileFormat::Toml),
                );
            }
            None => {
                builder = builder.add_source(
                    File::with_name("config.toml")
                        .required(false)
                        .format(config::FileFormat::Toml),
                );
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;

        if self.server.body_limit_bytes == 0 {
            return Err(ConfigError::invalid("Request body limit must be positive"));
        }

        if self.provider.timeout_seconds == 0 || self.provider.timeout_seconds > 300 {
            return Err(ConfigError::invalid(
                "Provider timeout must be between 1 and 300 seconds",
            ));
        }

        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            return Err(ConfigError::invalid(
                "Provider base URL must be a valid HTTP or HTTPS URL",
            ));
        }

        if self.areas.table_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("Area table path cannot be empty"));
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::invalid(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::invalid(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        Ok(())
    }
}
