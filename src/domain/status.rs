//! Read-only views of remote bot state.
//!
//! These types are owned by the remote bot service; the console only
//! deserializes and displays them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trading state reported for one running bot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BotData {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub trade_window: Option<String>,
    #[serde(default)]
    pub start_trade_time: Option<serde_json::Value>,
    #[serde(default)]
    pub end_trade_time: Option<serde_json::Value>,
    #[serde(default)]
    pub total_profit_loss: Option<Decimal>,
    #[serde(default)]
    pub total_trades: Option<u64>,
    #[serde(default)]
    pub successful_trades: Option<u64>,
    #[serde(default)]
    pub failed_trades: Option<u64>,
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default)]
    pub quote_currency: Option<String>,
    #[serde(default)]
    pub base_current_currency_quantity: Option<Decimal>,
    #[serde(default)]
    pub quote_current_currency_quantity: Option<Decimal>,
    /// Any fields this console does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BotData {
    /// True when the bot runs without an end time.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.trade_window.as_deref() == Some("infinite")
    }
}

/// One entry of `GET /statuses`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunningBotStatus {
    pub bot_name: String,
    #[serde(default)]
    pub bot_data: BotData,
}

impl RunningBotStatus {
    /// Menu label used when choosing a bot to stop.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} ({}, {})",
            self.bot_name,
            self.bot_data.symbol.as_deref().unwrap_or("?"),
            self.bot_data.interval.as_deref().unwrap_or("?"),
        )
    }
}

/// Response of `GET {endpoint}/statuses`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StatusesResponse {
    #[serde(default)]
    pub running_bots: Vec<RunningBotStatus>,
}

/// Response of `POST {endpoint}/start` and `POST {endpoint}/stop`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Decoded response for any bot action.
#[derive(Debug, Clone, PartialEq)]
pub enum BotResponse {
    Statuses(StatusesResponse),
    Message(MessageResponse),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn statuses_response_decodes_bot_data() {
        let body = serde_json::json!({
            "running_bots": [{
                "bot_name": "trendr-btc",
                "bot_data": {
                    "symbol": "BTCUSDT",
                    "interval": "1h",
                    "trade_window": "infinite",
                    "start_trade_time": "2026-10-16T10:00:00Z",
                    "total_profit_loss": -12.5,
                    "total_trades": 4,
                    "successful_trades": 3,
                    "failed_trades": 1,
                    "strategy": "ema-cross"
                }
            }]
        });

        let response: StatusesResponse = serde_json::from_value(body).unwrap();
        let bot = &response.running_bots[0];
        assert_eq!(bot.bot_name, "trendr-btc");
        assert!(bot.bot_data.is_infinite());
        assert_eq!(bot.bot_data.total_profit_loss, Some(dec!(-12.5)));
        assert_eq!(bot.bot_data.total_trades, Some(4));
        assert_eq!(bot.bot_data.extra["strategy"], "ema-cross");
        assert_eq!(bot.label(), "trendr-btc (BTCUSDT, 1h)");
    }

    #[test]
    fn missing_running_bots_is_empty() {
        let response: StatusesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.running_bots.is_empty());
    }
}
