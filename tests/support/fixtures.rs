//! Shared registry and file fixtures.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use botdeck::domain::bot::{BotConfigEntry, BotKey, BotRegistry};
use url::Url;

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Write `contents` to a unique file under the temp dir.
pub fn write_temp(prefix: &str, extension: &str, contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("botdeck-{prefix}-{nanos}-{suffix}.{extension}"));
    fs::write(&path, contents).expect("write temp file");
    path
}

/// Registry with a single `trendr` bot at `endpoint`.
pub fn registry(endpoint: &str) -> Arc<BotRegistry> {
    let entry = BotConfigEntry {
        name: "Trendr".to_string(),
        description: "Trend follower".to_string(),
        endpoint: Url::parse(endpoint).expect("valid endpoint"),
    };
    Arc::new(BotRegistry::from_entries([("trendr".to_string(), entry)]).expect("registry"))
}

pub fn trendr() -> BotKey {
    BotKey::parse("trendr").expect("bot key")
}

/// `GET /statuses` body with the given `(bot_name, symbol, interval)` rows.
pub fn statuses_body(bots: &[(&str, &str, &str)]) -> serde_json::Value {
    let running: Vec<_> = bots
        .iter()
        .map(|(name, symbol, interval)| {
            serde_json::json!({
                "bot_name": name,
                "bot_data": {
                    "symbol": symbol,
                    "interval": interval,
                    "trade_window": "infinite",
                    "start_trade_time": "2026-10-16T10:00:00Z",
                    "total_profit_loss": 12.5,
                    "total_trades": 3
                }
            })
        })
        .collect();
    serde_json::json!({ "running_bots": running })
}
