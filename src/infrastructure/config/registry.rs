//! Bot registry file loading.

use std::path::Path;

use tracing::info;

use crate::domain::bot::BotRegistry;
use crate::error::{ConfigError, Result};

/// Read and parse the bot registry JSON at `path`.
///
/// # Errors
/// Any read or parse failure is a [`ConfigError::Registry`] naming the file.
#[allow(clippy::result_large_err)]
pub fn load_registry<P: AsRef<Path>>(path: P) -> Result<BotRegistry> {
    let path = path.as_ref();
    let registry_error = |reason: String| ConfigError::Registry {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| registry_error(e.to_string()))?;
    let registry = BotRegistry::from_json(&content).map_err(|e| registry_error(e.to_string()))?;

    info!(path = %path.display(), bots = registry.len(), "Bot registry loaded");
    Ok(registry)
}
