//! Telemetry WebSocket server.
//!
//! Accepts any number of publisher connections. Each connection gets a
//! welcome frame, then every received frame is audited, ingested, and
//! acknowledged with an echo. The acknowledgement is sent whether or not the
//! frame was stored; ingest failures never close the connection.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, trace, warn};

use super::audit::AuditLog;
use crate::application::ingest::{IngestOutcome, TelemetrySink};
use crate::error::Result;
use crate::port::outbound::telemetry::TelemetryStore;

/// First frame sent on every new connection.
pub const WELCOME: &str = "Welcome to the WebSocket server!";

/// Acknowledgement echoed for every received frame.
#[must_use]
pub fn ack(raw: &str) -> String {
    format!("Server received: {raw}")
}

/// Bound telemetry listener.
pub struct SinkServer<S> {
    listener: TcpListener,
    sink: Arc<TelemetrySink<S>>,
    audit: Arc<AuditLog>,
}

impl<S> SinkServer<S>
where
    S: TelemetryStore + 'static,
{
    /// Bind the listener.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound.
    pub async fn bind(addr: SocketAddr, sink: TelemetrySink<S>, audit: AuditLog) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            sink: Arc::new(sink),
            audit: Arc::new(audit),
        })
    }

    /// Address actually bound (useful with port 0).
    ///
    /// # Errors
    /// Returns an error if the socket has no local address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` flips to `true` or its sender is
    /// dropped. Connections already open keep running until they close.
    ///
    /// # Errors
    /// Returns an error only if the local address cannot be read.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let addr = self.local_addr()?;
        info!(addr = %addr, "WebSocket server running on ws://{addr}");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Telemetry sink shutting down");
                        break;
                    }
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let sink = Arc::clone(&self.sink);
                        let audit = Arc::clone(&self.audit);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer, sink, audit).await {
                                warn!(peer = %peer, error = %e, "WebSocket error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to accept connection");
                    }
                }
            }
        }

        Ok(())
    }
}

async fn handle_connection<S: TelemetryStore>(
    stream: TcpStream,
    peer: SocketAddr,
    sink: Arc<TelemetrySink<S>>,
    audit: Arc<AuditLog>,
) -> Result<()> {
    let ws = accept_async(stream).await?;
    info!(peer = %peer, "New client connected");
    audit.record("New client connected");

    let (mut write, mut read) = ws.split();
    write.send(Message::Text(WELCOME.to_string())).await?;

    while let Some(msg_result) = read.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                handle_frame(&text, &sink, &audit).await;
                write.send(Message::Text(ack(&text))).await?;
            }
            Ok(Message::Binary(bytes)) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                handle_frame(&text, &sink, &audit).await;
                write.send(Message::Text(ack(&text))).await?;
            }
            Ok(Message::Ping(data)) => {
                trace!(peer = %peer, "Received WebSocket ping");
                write.send(Message::Pong(data)).await?;
            }
            Ok(Message::Close(frame)) => {
                debug!(peer = %peer, frame = ?frame, "Close frame received");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(peer = %peer, error = %e, "WebSocket error");
                break;
            }
        }
    }

    info!(peer = %peer, "Client disconnected");
    Ok(())
}

async fn handle_frame<S: TelemetryStore>(text: &str, sink: &TelemetrySink<S>, audit: &AuditLog) {
    trace!(bytes = text.len(), "Received WebSocket text frame");
    audit.record(&format!("Received message: {text}"));

    match sink.ingest(text).await {
        IngestOutcome::Stored { table, row_id } => {
            debug!(table = %table, row_id, "Telemetry stored");
        }
        IngestOutcome::Ignored(reason) => {
            audit.record(&format!("Ignored message: {reason}"));
        }
        IngestOutcome::Failed(reason) => {
            audit.record(&format!("Failed to store message: {reason}"));
        }
    }
}
