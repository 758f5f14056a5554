//! Start and stop requests sent to bot services.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Symbols offered as suggestions when starting a bot.
pub const SUGGESTED_SYMBOLS: &[&str] = &["BTCUSDT", "ETHUSDT", "BTCETH", "DOGEUSDT", "RAYUSDT"];

/// Candle interval a bot trades on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[default]
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    pub const ALL: [Self; 6] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::OneDay,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::OneDay => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_str() == lower)
            .ok_or_else(|| DomainError::UnknownInterval(s.to_string()))
    }
}

/// How long a started bot keeps trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeWindow {
    #[default]
    Infinite,
    /// Fixed window in minutes.
    Minutes(u32),
}

impl TradeWindow {
    /// Windows offered when starting a bot, in menu order.
    pub const CHOICES: [Self; 15] = [
        Self::Infinite,
        Self::Minutes(1),
        Self::Minutes(5),
        Self::Minutes(10),
        Self::Minutes(15),
        Self::Minutes(30),
        Self::Minutes(45),
        Self::Minutes(60),
        Self::Minutes(120),
        Self::Minutes(240),
        Self::Minutes(360),
        Self::Minutes(480),
        Self::Minutes(600),
        Self::Minutes(720),
        Self::Minutes(1440),
    ];

    /// Wire label, e.g. `infinite`, `45m`, `2hr`.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Infinite => "infinite".to_string(),
            Self::Minutes(m) if m >= 60 && m % 60 == 0 => format!("{}hr", m / 60),
            Self::Minutes(m) => format!("{m}m"),
        }
    }
}

impl fmt::Display for TradeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for TradeWindow {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::CHOICES
            .into_iter()
            .find(|window| window.label() == lower)
            .ok_or_else(|| DomainError::UnknownTradeWindow(s.to_string()))
    }
}

impl Serialize for TradeWindow {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for TradeWindow {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A strictly positive decimal parsed from user input.
///
/// The accepted text is kept as typed and is what goes on the wire; the
/// decimal value is only used for validation and comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositiveAmount {
    raw: String,
    value: Decimal,
}

impl PositiveAmount {
    /// Parse user input; `field` names the prompt in error messages.
    ///
    /// # Errors
    /// Non-numeric or non-finite input yields [`DomainError::NotANumber`],
    /// values `<= 0` yield [`DomainError::NonPositive`], and positive values
    /// a decimal cannot hold (too large, or so small they round to zero)
    /// yield [`DomainError::OutOfRange`].
    pub fn parse(field: &'static str, input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        let not_a_number = || DomainError::NotANumber {
            field,
            input: input.to_string(),
        };

        // f64 parsing also admits "inf" and "nan" spellings.
        if trimmed
            .chars()
            .any(|c| c.is_alphabetic() && !matches!(c, 'e' | 'E'))
        {
            return Err(not_a_number());
        }
        let approx: f64 = trimmed.parse().map_err(|_| not_a_number())?;
        if approx.is_nan() {
            return Err(not_a_number());
        }
        if approx <= 0.0 {
            return Err(DomainError::NonPositive {
                field,
                input: trimmed.to_string(),
            });
        }

        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .ok()
            .filter(|value| *value > Decimal::ZERO)
            .ok_or_else(|| DomainError::OutOfRange {
                field,
                input: trimmed.to_string(),
            })?;

        Ok(Self {
            raw: trimmed.to_string(),
            value,
        })
    }

    /// Wrap an existing decimal.
    ///
    /// # Errors
    /// Returns [`DomainError::NonPositive`] for values `<= 0`.
    pub fn new(field: &'static str, value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::NonPositive {
                field,
                input: value.to_string(),
            });
        }
        Ok(Self {
            raw: value.to_string(),
            value,
        })
    }

    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.value
    }

    /// The accepted input text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PositiveAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PositiveAmount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for PositiveAmount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse("amount", &raw).map_err(serde::de::Error::custom)
    }
}

/// Normalize a trading pair symbol to uppercase.
///
/// # Errors
/// Returns [`DomainError::InvalidSymbol`] unless the symbol is non-empty
/// ASCII alphanumeric.
pub fn normalize_symbol(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::InvalidSymbol(raw.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Body of `POST {endpoint}/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStartRequest {
    pub symbol: String,
    pub interval: Interval,
    pub starting_trade_amount: PositiveAmount,
    pub trade_allocation: PositiveAmount,
    pub trade_window: TradeWindow,
}

/// Body of `POST {endpoint}/stop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStopRequest {
    pub bot_name: String,
}
