//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::adapter::inbound::websocket::{AuditLog, SinkServer};
use crate::adapter::outbound::http::HttpBotTransport;
use crate::adapter::outbound::sqlite::SqliteTelemetryStore;
use crate::application::dispatch::Dispatcher;
use crate::application::ingest::TelemetrySink;
use crate::domain::bot::BotRegistry;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Handle to a sink running on a background task.
pub struct SinkHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Result<()>>,
}

impl SinkHandle {
    /// Stop accepting connections and wait for the accept loop to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        match self.task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Telemetry sink failed"),
            Err(e) => error!(error = %e, "Telemetry sink task panicked"),
        }
    }
}

/// Open the telemetry database and audit log, then bind the listener.
///
/// # Errors
/// Returns an error if the database, the audit log, or the listen address
/// cannot be opened.
pub async fn build_sink(config: &Config) -> Result<SinkServer<SqliteTelemetryStore>> {
    let store = SqliteTelemetryStore::open(&config.database)?;
    let audit = AuditLog::open(&config.sink.audit_log)?;
    let server = SinkServer::bind(config.sink_addr()?, TelemetrySink::new(store), audit).await?;
    info!(
        addr = %server.local_addr()?,
        database = %config.database,
        audit_log = %config.sink.audit_log,
        "Telemetry sink bound"
    );
    Ok(server)
}

/// Run `server` on a background task.
#[must_use]
pub fn spawn_sink(server: SinkServer<SqliteTelemetryStore>) -> SinkHandle {
    let (shutdown, rx) = watch::channel(false);
    let task = tokio::spawn(server.run(rx));
    SinkHandle { shutdown, task }
}

/// Build the bot dispatcher over HTTP.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn build_dispatcher(
    config: &Config,
    registry: BotRegistry,
) -> Result<Dispatcher<HttpBotTransport>> {
    let transport = HttpBotTransport::new(config.http.timeout())?;
    Ok(Dispatcher::new(Arc::new(registry), transport))
}
