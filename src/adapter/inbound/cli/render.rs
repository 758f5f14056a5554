//! Running-bot status rendering.
//!
//! [`render_statuses`] turns a statuses response into display rows against a
//! fixed `now`, so elapsed and remaining times are recomputed on every
//! request and can be tested without a clock. [`print_statuses`] writes the
//! rows to the terminal.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use super::output;
use crate::domain::status::{RunningBotStatus, StatusesResponse};

/// Shown when the remaining time of a fixed window is not positive.
pub const WINDOW_ENDED: &str = "Trade window ended";

/// Shown in place of a timestamp that cannot be read.
pub const UNKNOWN: &str = "unknown";

/// Timing part of a status row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowView {
    /// Bot trades until stopped.
    Infinite { started: String, elapsed: String },
    /// Bot trades for a fixed window.
    Fixed {
        window: String,
        ends: String,
        remaining: String,
    },
}

/// One rendered running bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub bot_name: String,
    pub timing: WindowView,
    pub profit_loss: Decimal,
    pub total_trades: u64,
    pub successful_trades: u64,
    pub failed_trades: u64,
}

impl StatusView {
    #[must_use]
    pub fn is_loss(&self) -> bool {
        self.profit_loss.is_sign_negative() && !self.profit_loss.is_zero()
    }
}

/// Render every running bot against `now`.
#[must_use]
pub fn render_statuses(response: &StatusesResponse, now: DateTime<Utc>) -> Vec<StatusView> {
    response
        .running_bots
        .iter()
        .map(|bot| render_bot(bot, now))
        .collect()
}

fn render_bot(bot: &RunningBotStatus, now: DateTime<Utc>) -> StatusView {
    let data = &bot.bot_data;

    let timing = if data.is_infinite() {
        let start = data.start_trade_time.as_ref().and_then(parse_timestamp);
        WindowView::Infinite {
            started: start.map_or_else(|| UNKNOWN.to_string(), format_timestamp),
            elapsed: start.map_or_else(
                || UNKNOWN.to_string(),
                |start| format_duration((now - start).num_seconds()),
            ),
        }
    } else {
        let end = data.end_trade_time.as_ref().and_then(parse_timestamp);
        WindowView::Fixed {
            window: data
                .trade_window
                .as_deref()
                .map_or_else(|| UNKNOWN.to_string(), convert_trade_window),
            ends: end.map_or_else(|| UNKNOWN.to_string(), format_timestamp),
            remaining: end.map_or_else(|| UNKNOWN.to_string(), |end| remaining(end, now)),
        }
    };

    StatusView {
        bot_name: bot.bot_name.clone(),
        timing,
        profit_loss: data.total_profit_loss.unwrap_or_default(),
        total_trades: data.total_trades.unwrap_or(0),
        successful_trades: data.successful_trades.unwrap_or(0),
        failed_trades: data.failed_trades.unwrap_or(0),
    }
}

fn remaining(end: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let millis = (end - now).num_milliseconds();
    if millis <= 0 {
        return WINDOW_ENDED.to_string();
    }
    format_duration(millis / 1000)
}

/// Convert a `"HH:MM"` window to `"{h}hr"` or `"{m}m"`.
///
/// Labels that are not in `HH:MM` form (`"2hr"`, `"45m"`) pass through.
#[must_use]
pub fn convert_trade_window(window: &str) -> String {
    let Some((hours, minutes)) = window.split_once(':') else {
        return window.to_string();
    };
    match (hours.trim().parse::<u32>(), minutes.trim().parse::<u32>()) {
        (Ok(h), _) if h > 0 => format!("{h}hr"),
        (Ok(_), Ok(m)) => format!("{m}m"),
        _ => window.to_string(),
    }
}

/// Format whole seconds as `"1 hour 30 minutes 0 seconds"`.
///
/// Zero hours and minutes are omitted; seconds are always shown. Negative
/// input is clamped to zero.
#[must_use]
pub fn format_duration(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "minute"));
    }
    parts.push(unit(seconds, "second"));
    parts.join(" ")
}

fn unit(value: i64, name: &str) -> String {
    if value == 1 {
        format!("{value} {name}")
    } else {
        format!("{value} {name}s")
    }
}

/// Read an RFC 3339 string, a naive UTC datetime, or epoch milliseconds.
#[must_use]
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ms) = s.parse::<i64>() {
                return Utc.timestamp_millis_opt(ms).single();
            }
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                        .ok()
                        .map(|naive| naive.and_utc())
                })
        }
        _ => None,
    }
}

/// `dd-mm-yyyy h:mm:ssAM` in UTC.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    format!("{} UTC", at.format("%d-%m-%Y %-I:%M:%S%p"))
}

/// Print the statuses of one bot service.
pub fn print_statuses(bot: &str, response: &StatusesResponse, now: DateTime<Utc>) {
    let views = render_statuses(response, now);
    if views.is_empty() {
        output::warning("No running bots found.");
        return;
    }

    output::section(&format!("{bot} running bots"));
    for view in &views {
        println!();
        output::field("Bot Name:", output::highlight(&view.bot_name));
        match &view.timing {
            WindowView::Infinite { started, elapsed } => {
                output::field("Trade Window:", "infinite");
                output::field("Start Time:", started);
                output::field("Trading Duration:", output::positive(elapsed));
            }
            WindowView::Fixed {
                window,
                ends,
                remaining,
            } => {
                output::field("Trade Window:", window);
                output::field("End Time:", ends);
                output::field("Time Remaining:", output::positive(remaining));
            }
        }

        let pnl = if view.is_loss() {
            output::negative(view.profit_loss)
        } else {
            output::positive(view.profit_loss)
        };
        output::field("Profit/Loss:", format!("{pnl} USDT"));
        output::field("Trades:", view.total_trades);
        output::field("Success:", view.successful_trades);
        output::field("Failed:", view.failed_trades);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::BotData;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-10-16T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn status(data: BotData) -> StatusesResponse {
        StatusesResponse {
            running_bots: vec![RunningBotStatus {
                bot_name: "trendr-btc".into(),
                bot_data: data,
            }],
        }
    }

    #[test]
    fn ninety_minutes_formats_with_zero_seconds() {
        assert_eq!(format_duration(90 * 60), "1 hour 30 minutes 0 seconds");
    }

    #[test]
    fn duration_uses_singular_only_for_one() {
        assert_eq!(format_duration(0), "0 seconds");
        assert_eq!(format_duration(1), "1 second");
        assert_eq!(format_duration(61), "1 minute 1 second");
        assert_eq!(format_duration(2 * 3600 + 2), "2 hours 2 seconds");
        assert_eq!(format_duration(-30), "0 seconds");
    }

    #[test]
    fn trade_window_conversion() {
        assert_eq!(convert_trade_window("02:00"), "2hr");
        assert_eq!(convert_trade_window("00:45"), "45m");
        assert_eq!(convert_trade_window("2hr"), "2hr");
        assert_eq!(convert_trade_window("ab:cd"), "ab:cd");
    }

    #[test]
    fn timestamps_accept_rfc3339_and_epoch_millis() {
        let expected = now();
        assert_eq!(parse_timestamp(&json!("2026-10-16T12:00:00Z")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2026-10-16T23:00:00+11:00")), Some(expected));
        assert_eq!(parse_timestamp(&json!(expected.timestamp_millis())), Some(expected));
        assert_eq!(parse_timestamp(&json!("2026-10-16T12:00:00")), Some(expected));
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
    }

    #[test]
    fn timestamp_format_is_twelve_hour() {
        let at = DateTime::parse_from_rfc3339("2026-10-06T14:05:09Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(at), "06-10-2026 2:05:09PM UTC");
    }

    #[test]
    fn infinite_window_shows_elapsed_time() {
        let views = render_statuses(
            &status(BotData {
                trade_window: Some("infinite".into()),
                start_trade_time: Some(json!("2026-10-16T10:30:00Z")),
                ..BotData::default()
            }),
            now(),
        );

        assert_eq!(
            views[0].timing,
            WindowView::Infinite {
                started: "16-10-2026 10:30:00AM UTC".into(),
                elapsed: "1 hour 30 minutes 0 seconds".into(),
            }
        );
    }

    #[test]
    fn fixed_window_shows_remaining_time() {
        let views = render_statuses(
            &status(BotData {
                trade_window: Some("04:00".into()),
                end_trade_time: Some(json!("2026-10-16T12:00:45Z")),
                ..BotData::default()
            }),
            now(),
        );

        match &views[0].timing {
            WindowView::Fixed {
                window, remaining, ..
            } => {
                assert_eq!(window, "4hr");
                assert_eq!(remaining, "45 seconds");
            }
            other => panic!("expected fixed window, got {other:?}"),
        }
    }

    #[test]
    fn elapsed_window_reports_ended() {
        for end in ["2026-10-16T12:00:00Z", "2026-10-16T11:00:00Z"] {
            let views = render_statuses(
                &status(BotData {
                    trade_window: Some("1hr".into()),
                    end_trade_time: Some(json!(end)),
                    ..BotData::default()
                }),
                now(),
            );
            assert!(matches!(
                &views[0].timing,
                WindowView::Fixed { remaining, .. } if remaining == WINDOW_ENDED
            ));
        }
    }

    #[test]
    fn unreadable_times_render_unknown() {
        let views = render_statuses(
            &status(BotData {
                trade_window: Some("infinite".into()),
                start_trade_time: Some(json!("soon")),
                ..BotData::default()
            }),
            now(),
        );
        assert_eq!(
            views[0].timing,
            WindowView::Infinite {
                started: UNKNOWN.into(),
                elapsed: UNKNOWN.into(),
            }
        );
    }

    #[test]
    fn counters_default_to_zero_and_loss_is_flagged() {
        let views = render_statuses(&status(BotData::default()), now());
        assert_eq!(views[0].profit_loss, Decimal::ZERO);
        assert_eq!(views[0].total_trades, 0);
        assert_eq!(views[0].failed_trades, 0);
        assert!(!views[0].is_loss());

        let views = render_statuses(
            &status(BotData {
                total_profit_loss: Some(dec!(-3.25)),
                successful_trades: Some(2),
                ..BotData::default()
            }),
            now(),
        );
        assert!(views[0].is_loss());
        assert_eq!(views[0].successful_trades, 2);
    }

    #[test]
    fn empty_response_renders_nothing() {
        assert!(render_statuses(&StatusesResponse::default(), now()).is_empty());
    }
}
