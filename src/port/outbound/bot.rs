//! Bot transport port.
//!
//! Carries exactly one request to a bot service and returns the decoded JSON
//! body. Implementations must not retry.

use std::future::Future;

use crate::error::RemoteCallError;

/// HTTP method used for a bot request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound call to a bot endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct BotRequest {
    /// Display name of the bot, used in error messages.
    pub bot: String,
    pub method: Method,
    pub url: String,
    /// JSON body for `POST` requests.
    pub body: Option<serde_json::Value>,
}

/// Sends requests to bot services.
///
/// Transport failures and non-2xx responses are both reported as
/// [`RemoteCallError`]; a 2xx response yields its JSON body.
pub trait BotTransport: Send + Sync {
    fn send(
        &self,
        request: BotRequest,
    ) -> impl Future<Output = Result<serde_json::Value, RemoteCallError>> + Send;
}
