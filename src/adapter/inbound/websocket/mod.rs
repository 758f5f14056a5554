//! Telemetry sink WebSocket server.

pub mod audit;
pub mod server;

pub use audit::AuditLog;
pub use server::{ack, SinkServer, WELCOME};
