//! Telemetry snapshots pushed by running bots.
//!
//! Bots publish `{ "log": "<json>" }` envelopes where the inner JSON is
//! `{ "data": TelemetryPayload }`. Each payload is stored in a table named
//! after its currency pair and interval.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::DomainError;
use super::request::Interval;

/// Maximum length of one currency code inside a table name.
pub const MAX_CURRENCY_LEN: usize = 16;

/// Outer frame received from a publisher.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryEnvelope {
    pub log: serde_json::Value,
}

/// Decoded contents of the `log` field.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryLog {
    pub data: TelemetryPayload,
}

impl TelemetryEnvelope {
    /// Decode the embedded log.
    ///
    /// The `log` field is normally a JSON string; an already-decoded object
    /// is accepted as well.
    ///
    /// # Errors
    /// Returns the JSON error when the embedded document does not decode.
    pub fn decode(self) -> Result<TelemetryPayload, serde_json::Error> {
        let log: TelemetryLog = match self.log {
            serde_json::Value::String(raw) => serde_json::from_str(&raw)?,
            other => serde_json::from_value(other)?,
        };
        Ok(log.data)
    }
}

/// One trading snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TelemetryPayload {
    // identity
    #[serde(default)]
    pub bot_name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    pub interval: String,
    #[serde(default, deserialize_with = "text")]
    pub trade_window: Option<String>,
    pub base_currency: String,
    pub quote_currency: String,

    // trading state
    #[serde(default, deserialize_with = "number")]
    pub starting_trade_amount: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub trade_allocation: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub base_current_currency_quantity: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub quote_current_currency_quantity: Option<f64>,
    #[serde(default, deserialize_with = "text")]
    pub start_trade_time: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub end_trade_time: Option<String>,

    // running totals
    #[serde(default, deserialize_with = "number")]
    pub total_profit_loss: Option<f64>,
    #[serde(default, deserialize_with = "count")]
    pub total_trades: Option<i64>,
    #[serde(default, deserialize_with = "count")]
    pub successful_trades: Option<i64>,
    #[serde(default, deserialize_with = "count")]
    pub failed_trades: Option<i64>,

    // latest market action
    #[serde(default, deserialize_with = "text")]
    pub market_action: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub market_price: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub market_quantity: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub market_fee: Option<f64>,
    #[serde(default, deserialize_with = "number")]
    pub market_value: Option<f64>,
    #[serde(default, deserialize_with = "text")]
    pub market_timestamp: Option<String>,
}

/// Accept a JSON number or a numeric string.
fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected a number, got '{s}'"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a number, got {other}"
        ))),
    }
}

/// Like [`number`], but only whole values fit a count.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match number(deserializer)? {
        None => Ok(None),
        Some(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Ok(Some(n as i64)),
        Some(n) => Err(serde::de::Error::custom(format!(
            "expected a whole count, got {n}"
        ))),
    }
}

/// Accept a string or any scalar, stored as text.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(other) => Ok(Some(other.to_string())),
    }
}

/// Storage table for one currency pair and interval, e.g. `btcusdt_1h`.
///
/// Only ASCII alphanumeric currency codes and known intervals are accepted,
/// so the name is always a safe SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName(String);

impl TableName {
    /// Derive the table name from currency codes and an interval.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidIdentifier`] when a component falls
    /// outside the allow-list.
    pub fn derive(base: &str, quote: &str, interval: &str) -> Result<Self, DomainError> {
        let base = currency("base_currency", base)?;
        let quote = currency("quote_currency", quote)?;
        let interval: Interval = interval.parse().map_err(|_| DomainError::InvalidIdentifier {
            field: "interval",
            value: interval.to_string(),
        })?;
        Ok(Self(format!("{base}{quote}_{interval}")))
    }

    /// Derive the table name for a payload.
    ///
    /// # Errors
    /// See [`TableName::derive`].
    pub fn for_payload(payload: &TelemetryPayload) -> Result<Self, DomainError> {
        Self::derive(
            &payload.base_currency,
            &payload.quote_currency,
            &payload.interval,
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for use as an SQL identifier.
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn currency(field: &'static str, raw: &str) -> Result<String, DomainError> {
    let valid = !raw.is_empty()
        && raw.len() <= MAX_CURRENCY_LEN
        && raw.chars().all(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(DomainError::InvalidIdentifier {
            field,
            value: raw.to_string(),
        });
    }
    Ok(raw.to_ascii_lowercase())
}
