//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; `BOTDECK_REGISTRY` overrides the
//! registry path.
//!
//! # Example
//!
//! ```no_run
//! use botdeck::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default("config.toml")?;
//!     let _guard = config.init_logging();
//!     Ok(())
//! }
//! ```

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;

use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Environment variable that replaces [`Config::registry`].
pub const REGISTRY_ENV: &str = "BOTDECK_REGISTRY";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Path to the bot registry JSON file.
    #[serde(default = "default_registry_path")]
    pub registry: String,

    /// Path to SQLite database file for telemetry.
    ///
    /// Defaults to "botdeck.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    /// Telemetry sink settings.
    #[serde(default)]
    pub sink: SinkConfig,

    /// Bot HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telemetry WebSocket listener.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Start the sink next to the console.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Listen address.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Append-only connection and frame log.
    #[serde(default = "default_audit_log")]
    pub audit_log: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: default_bind(),
            audit_log: default_audit_log(),
        }
    }
}

/// Bot HTTP client.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HttpConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_registry_path() -> String {
    "config/bots.json".to_string()
}

fn default_database_path() -> String {
    "botdeck.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_audit_log() -> String {
    "websocket.log".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: default_registry_path(),
            database: default_database_path(),
            sink: SinkConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., an unparseable bind address)
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise use the built-in defaults.
    ///
    /// # Errors
    /// As [`Config::load`] for a file that exists.
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

    /// Initialize logging based on configuration.
    ///
    /// The returned guard must be held for as long as logs are written.
    #[must_use]
    pub fn init_logging(&self) -> Option<WorkerGuard> {
        self.logging.init()
    }

    /// Parsed sink listen address.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for an unparseable address.
    #[allow(clippy::result_large_err)]
    pub fn sink_addr(&self) -> Result<SocketAddr> {
        self.sink.bind.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidValue {
                field: "sink.bind",
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var(REGISTRY_ENV) {
            if !path.trim().is_empty() {
                self.registry = path;
            }
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.registry.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "registry" }.into());
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.sink.bind.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "sink.bind" }.into());
        }
        self.sink_addr()?;
        if self.sink.audit_log.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "sink.audit_log",
            }
            .into());
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
