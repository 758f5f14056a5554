//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod dispatch;
pub mod ingest;

pub use dispatch::{BotCommand, Dispatcher};
pub use ingest::{IngestOutcome, TelemetrySink};
