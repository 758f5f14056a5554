//! Bot command dispatcher.
//!
//! Translates a console action into exactly one request against the target
//! bot's endpoint. Unknown bots fail before any network activity; remote
//! failures are returned unchanged for the caller to report. Nothing is
//! retried or cached.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::bot::{BotAction, BotRegistry};
use crate::domain::request::{BotStartRequest, BotStopRequest};
use crate::domain::status::{BotResponse, MessageResponse, StatusesResponse};
use crate::error::{DispatchError, RemoteCallError, RemoteFailure};
use crate::port::outbound::bot::{BotRequest, BotTransport, Method};

/// An action together with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Statuses,
    Start(BotStartRequest),
    Stop(BotStopRequest),
}

impl BotCommand {
    #[must_use]
    pub const fn action(&self) -> BotAction {
        match self {
            Self::Statuses => BotAction::Statuses,
            Self::Start(_) => BotAction::Start,
            Self::Stop(_) => BotAction::Stop,
        }
    }

    fn into_body(self) -> Result<Option<Value>, serde_json::Error> {
        match self {
            Self::Statuses => Ok(None),
            Self::Start(request) => serde_json::to_value(request).map(Some),
            Self::Stop(request) => serde_json::to_value(request).map(Some),
        }
    }
}

/// Resolves bot keys against the registry and issues requests.
pub struct Dispatcher<T> {
    registry: Arc<BotRegistry>,
    transport: T,
}

impl<T: BotTransport> Dispatcher<T> {
    #[must_use]
    pub fn new(registry: Arc<BotRegistry>, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &BotRegistry {
        &self.registry
    }

    /// Send one command to the bot registered under `key`.
    ///
    /// # Errors
    /// - [`DispatchError::UnknownBot`] when `key` is not registered; no
    ///   request is made
    /// - [`DispatchError::Remote`] on transport failure, non-2xx status, or an
    ///   undecodable response body
    pub async fn dispatch(
        &self,
        key: &str,
        command: BotCommand,
    ) -> Result<BotResponse, DispatchError> {
        let Some((bot_key, bot)) = self.registry.resolve(key) else {
            warn!(bot = %key, "Bot not found in registry");
            return Err(DispatchError::UnknownBot {
                key: key.trim().to_lowercase(),
            });
        };

        let action = command.action();
        let body = command.into_body().map_err(|e| RemoteCallError {
            bot: bot.name.clone(),
            message: format!("failed to encode request: {e}"),
            kind: RemoteFailure::Decode,
        })?;
        let method = if action.is_read_only() {
            Method::Get
        } else {
            Method::Post
        };
        let request = BotRequest {
            bot: bot.name.clone(),
            method,
            url: bot.action_url(action),
            body,
        };

        debug!(bot = %bot_key, action = %action, url = %request.url, "Dispatching bot request");
        let value = self.transport.send(request).await?;

        decode(&bot.name, action, value).map_err(DispatchError::from)
    }

    /// Fetch the running bots of a bot service.
    ///
    /// # Errors
    /// See [`Dispatcher::dispatch`].
    pub async fn statuses(&self, key: &str) -> Result<StatusesResponse, DispatchError> {
        match self.dispatch(key, BotCommand::Statuses).await? {
            BotResponse::Statuses(statuses) => Ok(statuses),
            BotResponse::Message(_) => Ok(StatusesResponse::default()),
        }
    }

    /// Start a bot instance.
    ///
    /// # Errors
    /// See [`Dispatcher::dispatch`].
    pub async fn start(
        &self,
        key: &str,
        request: BotStartRequest,
    ) -> Result<MessageResponse, DispatchError> {
        let response = self.dispatch(key, BotCommand::Start(request)).await?;
        Ok(into_message(response))
    }

    /// Stop a running bot instance by name.
    ///
    /// # Errors
    /// See [`Dispatcher::dispatch`].
    pub async fn stop(&self, key: &str, bot_name: &str) -> Result<MessageResponse, DispatchError> {
        let request = BotStopRequest {
            bot_name: bot_name.to_string(),
        };
        let response = self.dispatch(key, BotCommand::Stop(request)).await?;
        Ok(into_message(response))
    }
}

fn into_message(response: BotResponse) -> MessageResponse {
    match response {
        BotResponse::Message(message) => message,
        BotResponse::Statuses(_) => MessageResponse::default(),
    }
}

fn decode(bot: &str, action: BotAction, value: Value) -> Result<BotResponse, RemoteCallError> {
    let invalid = |e: serde_json::Error| RemoteCallError {
        bot: bot.to_string(),
        message: format!("invalid response body: {e}"),
        kind: RemoteFailure::Decode,
    };

    match (action, value) {
        (BotAction::Statuses, Value::Null) => Ok(BotResponse::Statuses(StatusesResponse::default())),
        (BotAction::Statuses, value) => serde_json::from_value(value)
            .map(BotResponse::Statuses)
            .map_err(invalid),
        (_, Value::Null) => Ok(BotResponse::Message(MessageResponse::default())),
        (_, Value::String(message)) => Ok(BotResponse::Message(MessageResponse {
            message: Some(message),
        })),
        (_, value) => serde_json::from_value(value)
            .map(BotResponse::Message)
            .map_err(invalid),
    }
}
