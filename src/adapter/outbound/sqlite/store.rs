//! SQLite telemetry store implementation.
//!
//! One table per currency pair and interval, created on first use. Table
//! names come from [`TableName`], which only admits allow-listed characters;
//! every value is passed as a bound parameter.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Nullable, Text};
use tracing::{debug, info};

use super::connection::{configure_sqlite_connection, create_pool, enable_wal, DbPool};
use crate::domain::telemetry::{TableName, TelemetryPayload};
use crate::error::{Error, Result};
use crate::port::outbound::telemetry::TelemetryStore;

/// Columns written for every row, in bind order.
const COLUMNS: &str = "bot_name, symbol, interval, trade_window, base_currency, quote_currency, \
    starting_trade_amount, trade_allocation, base_current_currency_quantity, \
    quote_current_currency_quantity, start_trade_time, end_trade_time, total_profit_loss, \
    total_trades, successful_trades, failed_trades, market_action, market_price, \
    market_quantity, market_fee, market_value, market_timestamp";

const PLACEHOLDERS: &str = "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

fn create_table_sql(table: &TableName) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            bot_name TEXT,
            symbol TEXT,
            interval TEXT NOT NULL,
            trade_window TEXT,
            base_currency TEXT NOT NULL,
            quote_currency TEXT NOT NULL,
            starting_trade_amount REAL,
            trade_allocation REAL,
            base_current_currency_quantity REAL,
            quote_current_currency_quantity REAL,
            start_trade_time TEXT,
            end_trade_time TEXT,
            total_profit_loss REAL,
            total_trades INTEGER,
            successful_trades INTEGER,
            failed_trades INTEGER,
            market_action TEXT,
            market_price REAL,
            market_quantity REAL,
            market_fee REAL,
            market_value REAL,
            market_timestamp TEXT,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
        table.quoted()
    )
}

#[derive(QueryableByName)]
struct LastInsertRowId {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

#[derive(QueryableByName)]
struct TableRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// SQLite-backed telemetry store.
///
/// Diesel calls are blocking, so each operation runs on the blocking thread
/// pool with its own pooled connection.
#[derive(Clone)]
pub struct SqliteTelemetryStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteTelemetryStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be created or configured.
    pub fn open(path: &str) -> Result<Self> {
        let pool = create_pool(path)?;
        enable_wal(&pool)?;
        info!(database = %path, "Telemetry database ready");
        Ok(Self::new(pool))
    }

    /// Names of all telemetry tables, sorted.
    ///
    /// # Errors
    /// Returns an error if the catalog query fails.
    pub async fn tables(&self) -> Result<Vec<String>> {
        self.blocking(|conn| {
            let rows: Vec<TableRow> = diesel::sql_query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .load(conn)
            .map_err(|e| Error::Database(e.to_string()))?;
            Ok(rows.into_iter().map(|row| row.name).collect())
        })
        .await
    }

    /// Number of rows stored in `table`.
    ///
    /// # Errors
    /// Returns an error if the table does not exist or the query fails.
    pub async fn row_count(&self, table: &TableName) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) AS count FROM {}", table.quoted());
        self.blocking(move |conn| {
            diesel::sql_query(sql)
                .get_result::<CountRow>(conn)
                .map(|row| row.count)
                .map_err(|e| Error::Database(e.to_string()))
        })
        .await
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
            configure_sqlite_connection(&mut conn)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| Error::Database(format!("blocking task failed: {e}")))?
    }
}

impl TelemetryStore for SqliteTelemetryStore {
    async fn ensure_table(&self, table: &TableName) -> Result<()> {
        let sql = create_table_sql(table);
        let name = table.to_string();
        self.blocking(move |conn| {
            diesel::sql_query(sql)
                .execute(conn)
                .map_err(|e| Error::Database(e.to_string()))?;
            debug!(table = %name, "Ensured telemetry table");
            Ok(())
        })
        .await
    }

    async fn insert(&self, table: &TableName, payload: &TelemetryPayload) -> Result<i64> {
        let sql = format!(
            "INSERT INTO {} ({COLUMNS}) VALUES ({PLACEHOLDERS})",
            table.quoted()
        );
        let p = payload.clone();
        self.blocking(move |conn| {
            conn.immediate_transaction(|conn| {
                diesel::sql_query(sql)
                    .bind::<Nullable<Text>, _>(p.bot_name)
                    .bind::<Nullable<Text>, _>(p.symbol)
                    .bind::<Text, _>(p.interval)
                    .bind::<Nullable<Text>, _>(p.trade_window)
                    .bind::<Text, _>(p.base_currency)
                    .bind::<Text, _>(p.quote_currency)
                    .bind::<Nullable<Double>, _>(p.starting_trade_amount)
                    .bind::<Nullable<Double>, _>(p.trade_allocation)
                    .bind::<Nullable<Double>, _>(p.base_current_currency_quantity)
                    .bind::<Nullable<Double>, _>(p.quote_current_currency_quantity)
                    .bind::<Nullable<Text>, _>(p.start_trade_time)
                    .bind::<Nullable<Text>, _>(p.end_trade_time)
                    .bind::<Nullable<Double>, _>(p.total_profit_loss)
                    .bind::<Nullable<BigInt>, _>(p.total_trades)
                    .bind::<Nullable<BigInt>, _>(p.successful_trades)
                    .bind::<Nullable<BigInt>, _>(p.failed_trades)
                    .bind::<Nullable<Text>, _>(p.market_action)
                    .bind::<Nullable<Double>, _>(p.market_price)
                    .bind::<Nullable<Double>, _>(p.market_quantity)
                    .bind::<Nullable<Double>, _>(p.market_fee)
                    .bind::<Nullable<Double>, _>(p.market_value)
                    .bind::<Nullable<Text>, _>(p.market_timestamp)
                    .execute(conn)?;

                diesel::sql_query("SELECT last_insert_rowid() AS id")
                    .get_result::<LastInsertRowId>(conn)
                    .map(|row| row.id)
            })
            .map_err(|e: diesel::result::Error| Error::Database(e.to_string()))
        })
        .await
    }
}
