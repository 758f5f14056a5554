use thiserror::Error;

use crate::domain::bot::RegistryError;
use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
///
/// Every variant is fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("unable to load bot registry {path}: {reason}")]
    Registry { path: String, reason: String },
}

/// Kind of failure behind a [`RemoteCallError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailure {
    /// The request never produced an HTTP response.
    Network,
    /// The bot answered with a non-2xx status.
    Status(u16),
    /// A 2xx response body could not be decoded.
    Decode,
}

/// A bot call that failed in transport or on the remote side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{bot}: {message}")]
pub struct RemoteCallError {
    /// Display name of the bot.
    pub bot: String,
    /// Remote-supplied message, or a generic description.
    pub message: String,
    pub kind: RemoteFailure,
}

/// Errors surfaced by the bot command dispatcher.
///
/// Both variants are recoverable: the console reports them and returns to
/// the nearest menu.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Bot \"{key}\" not found in configuration.")]
    UnknownBot { key: String },

    #[error(transparent)]
    Remote(#[from] RemoteCallError),
}

/// Reasons a telemetry frame was not persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("malformed telemetry: {0}")]
    Parse(String),

    #[error("envelope has no log field")]
    MissingLog,

    #[error(transparent)]
    Table(#[from] DomainError),

    #[error("persistence failed: {0}")]
    Persistence(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(Box::new(err))
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

impl From<RegistryError> for ConfigError {
    fn from(err: RegistryError) -> Self {
        ConfigError::Registry {
            path: String::from("<inline>"),
            reason: err.to_string(),
        }
    }
}
