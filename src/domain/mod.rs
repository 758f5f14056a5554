//! Domain types shared by the console and the telemetry sink.
//!
//! - [`bot`] - bot registry and remote actions
//! - [`request`] - start/stop request bodies and their validated fields
//! - [`status`] - read-only views returned by bot services
//! - [`telemetry`] - ingested snapshots and table naming
//! - [`error`] - invariant violations

pub mod bot;
pub mod error;
pub mod request;
pub mod status;
pub mod telemetry;

pub use bot::{BotAction, BotConfigEntry, BotKey, BotRegistry};
pub use error::DomainError;
pub use request::{BotStartRequest, BotStopRequest, Interval, PositiveAmount, TradeWindow};
pub use status::{BotData, BotResponse, MessageResponse, RunningBotStatus, StatusesResponse};
pub use telemetry::{TableName, TelemetryEnvelope, TelemetryPayload};
