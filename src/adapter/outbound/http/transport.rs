//! reqwest-backed bot transport.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RemoteCallError, RemoteFailure, Result};
use crate::port::outbound::bot::{BotRequest, BotTransport, Method};

/// Sends bot requests over HTTP with a fixed timeout.
#[derive(Debug, Clone)]
pub struct HttpBotTransport {
    client: Client,
}

impl HttpBotTransport {
    /// Build a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("botdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl BotTransport for HttpBotTransport {
    async fn send(&self, request: BotRequest) -> std::result::Result<Value, RemoteCallError> {
        let BotRequest {
            bot,
            method,
            url,
            body,
        } = request;

        let builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self
                .client
                .post(&url)
                .json(&body.unwrap_or_else(|| Value::Object(serde_json::Map::new()))),
        };

        let response = builder.send().await.map_err(|e| {
            warn!(bot = %bot, url = %url, error = %e, "Bot request failed");
            RemoteCallError {
                bot: bot.clone(),
                message: e.to_string(),
                kind: RemoteFailure::Network,
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| RemoteCallError {
            bot: bot.clone(),
            message: e.to_string(),
            kind: RemoteFailure::Network,
        })?;
        debug!(bot = %bot, url = %url, status = %status, bytes = text.len(), "Bot responded");

        if !status.is_success() {
            return Err(RemoteCallError {
                message: remote_message(&text).unwrap_or_else(|| generic_message(status)),
                bot,
                kind: RemoteFailure::Status(status.as_u16()),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

/// Extract `message` from a JSON error body.
fn remote_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        Value::String(s) => (!s.trim().is_empty()).then(|| s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn generic_message(status: StatusCode) -> String {
    format!("request failed with status {}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_message_prefers_message_field() {
        assert_eq!(
            remote_message(r#"{"message":"Bot not running"}"#).as_deref(),
            Some("Bot not running")
        );
        assert_eq!(remote_message(r#"{"error":"x"}"#), None);
        assert_eq!(remote_message("<html>502</html>"), None);
        assert_eq!(remote_message(r#"{"message":""}"#), None);
        assert_eq!(remote_message(r#"{"message":"  "}"#), None);
        assert_eq!(remote_message(r#"{"message":null}"#), None);
        assert_eq!(remote_message(r#"{"message":42}"#).as_deref(), Some("42"));
    }

    #[test]
    fn generic_message_includes_status() {
        assert_eq!(
            generic_message(StatusCode::SERVICE_UNAVAILABLE),
            "request failed with status 503"
        );
    }
}
