//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the two infrastructure dependencies: the HTTP
//! endpoints of bot services and the telemetry database.

pub mod bot;
pub mod telemetry;
