//! SQLite persistence adapters.
//!
//! Provides connection pooling and the SQLite-backed telemetry store using
//! Diesel ORM.

pub mod connection;
pub mod store;

pub use connection::{create_pool, DbPool};
pub use store::SqliteTelemetryStore;
