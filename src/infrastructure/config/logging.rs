//! Logging configuration and initialization.

use serde::Deserialize;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
    /// Log file; the interactive console owns the terminal, so logs default
    /// to a file. Unset means stderr.
    #[serde(default = "default_file")]
    pub file: Option<String>,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

#[allow(clippy::unnecessary_wraps)]
fn default_file() -> Option<String> {
    Some("botdeck.log".into())
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// Returns the appender guard when logging to a file; dropping it flushes
    /// and stops the writer thread.
    #[must_use]
    pub fn init(&self) -> Option<WorkerGuard> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let Some(file) = self.file.as_deref().filter(|f| !f.trim().is_empty()) else {
            let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
            let _ = match self.format.as_str() {
                "json" => builder.json().try_init(),
                _ => builder.try_init(),
            };
            return None;
        };

        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "botdeck.log".into(), |n| n.to_string_lossy().into_owned());
        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

        let builder = fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false);
        let _ = match self.format.as_str() {
            "json" => builder.json().try_init(),
            _ => builder.try_init(),
        };
        Some(guard)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            file: default_file(),
        }
    }
}
