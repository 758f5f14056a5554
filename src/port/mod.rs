//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   ┌──────────────┐        ┌──────────────────┐        ┌──────────────┐
//!   │ CLI session  │ ─────▶ │   Dispatcher     │ ─────▶ │ BotTransport │
//!   └──────────────┘        └──────────────────┘        └──────────────┘
//!   ┌──────────────┐        ┌──────────────────┐        ┌────────────────┐
//!   │ Sink server  │ ─────▶ │  TelemetrySink   │ ─────▶ │ TelemetryStore │
//!   └──────────────┘        └──────────────────┘        └────────────────┘
//! ```

pub mod outbound;

pub use outbound::bot::{BotRequest, BotTransport, Method};
pub use outbound::telemetry::TelemetryStore;
