//! Telemetry ingestion.
//!
//! Turns one raw WebSocket frame into at most one stored row. Frames that do
//! not carry a decodable `log` never reach the store; store failures are
//! reported in the outcome and never propagated, so a bad frame cannot tear
//! down the connection that delivered it.

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::telemetry::{TableName, TelemetryEnvelope, TelemetryPayload};
use crate::error::IngestError;
use crate::port::outbound::telemetry::TelemetryStore;

/// Result of ingesting one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A row was appended.
    Stored { table: TableName, row_id: i64 },
    /// The frame was dropped before touching storage.
    Ignored(IngestError),
    /// Storage rejected the row.
    Failed(IngestError),
}

/// Stateless per-frame handler shared by all connections.
pub struct TelemetrySink<S> {
    store: S,
}

impl<S: TelemetryStore> TelemetrySink<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Ingest one raw frame.
    pub async fn ingest(&self, raw: &str) -> IngestOutcome {
        let (table, payload) = match parse(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(error = %e, bytes = raw.len(), "Ignoring telemetry frame");
                return IngestOutcome::Ignored(e);
            }
        };

        if let Err(e) = self.store.ensure_table(&table).await {
            warn!(table = %table, error = %e, "Failed to create telemetry table");
            return IngestOutcome::Failed(IngestError::Persistence(e.to_string()));
        }

        match self.store.insert(&table, &payload).await {
            Ok(row_id) => {
                debug!(table = %table, row_id, "Stored telemetry row");
                IngestOutcome::Stored { table, row_id }
            }
            Err(e) => {
                warn!(table = %table, error = %e, "Failed to insert telemetry row");
                IngestOutcome::Failed(IngestError::Persistence(e.to_string()))
            }
        }
    }
}

/// Decode a frame and derive its table without touching storage.
///
/// # Errors
/// - [`IngestError::Parse`] for invalid JSON or an undecodable payload
/// - [`IngestError::MissingLog`] when the envelope has no `log` field
/// - [`IngestError::Table`] when the derived table name is not allowed
pub fn parse(raw: &str) -> Result<(TableName, TelemetryPayload), IngestError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| IngestError::Parse(e.to_string()))?;
    match value.get("log") {
        None | Some(Value::Null) => return Err(IngestError::MissingLog),
        Some(_) => {}
    }

    let envelope: TelemetryEnvelope =
        serde_json::from_value(value).map_err(|e| IngestError::Parse(e.to_string()))?;
    let payload = envelope
        .decode()
        .map_err(|e| IngestError::Parse(e.to_string()))?;
    let table = TableName::for_payload(&payload)?;

    Ok((table, payload))
}
