//! Telemetry storage port.

use std::future::Future;

use crate::domain::telemetry::{TableName, TelemetryPayload};
use crate::error::Result;

/// Append-only storage for telemetry rows.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`); the sink calls
///   them from many connections at once
/// - `ensure_table` must be idempotent and tolerate concurrent callers
///   creating the same table
/// - Rows are never updated or deleted
pub trait TelemetryStore: Send + Sync {
    /// Create the table if it does not exist yet.
    fn ensure_table(&self, table: &TableName) -> impl Future<Output = Result<()>> + Send;

    /// Append one row and return its identifier.
    fn insert(
        &self,
        table: &TableName,
        payload: &TelemetryPayload,
    ) -> impl Future<Output = Result<i64>> + Send;
}
