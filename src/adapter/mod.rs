//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - driving side: the interactive console and the telemetry
//!   WebSocket server
//! - [`outbound`] - driven side: HTTP bot transport and SQLite storage

pub mod inbound;
pub mod outbound;
