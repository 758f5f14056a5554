//! Botdeck - operator console for remote trading bots with a telemetry sink.
//!
//! Two independent pieces share this crate:
//!
//! - **Console** - reads a static bot registry, presents menus, and sends
//!   `start`, `stop` and `statuses` requests to the selected bot service.
//! - **Telemetry sink** - a WebSocket listener that stores bot snapshots in
//!   SQLite, one table per currency pair and interval.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - [`domain`] - Value types: bot registry, requests, statuses, telemetry
//! - [`port`] - Traits for bot transport and telemetry storage
//! - [`application`] - Dispatcher and ingest logic over the ports
//! - [`adapter`] - CLI, WebSocket server, HTTP client, SQLite store
//! - [`infrastructure`] - Configuration, logging, and wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use botdeck::infrastructure::config::registry::load_registry;
//!
//! let registry = load_registry("config/bots.json")?;
//! for (key, bot) in registry.iter() {
//!     println!("{key}: {}", bot.endpoint);
//! }
//! # Ok::<(), botdeck::error::Error>(())
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
