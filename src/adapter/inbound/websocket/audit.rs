//! Append-only audit log for the telemetry sink.
//!
//! Every connection and every received frame is written as one line:
//! `[2026-10-16T09:30:00.123Z] Received message: ...`.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::warn;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};

use crate::error::Result;

/// Shared line-oriented log file, safe to use from many connections.
///
/// Lines are handed to a background writer thread so connection tasks never
/// block on disk. Dropping the log flushes pending lines.
pub struct AuditLog {
    path: PathBuf,
    writer: NonBlocking,
    _guard: WorkerGuard,
}

impl AuditLog {
    /// Open `path` for appending, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let (writer, guard) = NonBlockingBuilder::default()
            .lossy(false)
            .thread_name("botdeck-audit")
            .finish(file);
        Ok(Self {
            path,
            writer,
            _guard: guard,
        })
    }

    /// Append one timestamped line. Write failures are logged, not returned.
    pub fn record(&self, message: &str) {
        let line = format!(
            "[{}] {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            message
        );
        // One write per line keeps concurrent lines whole.
        if let Err(e) = self.writer.clone().write_all(line.as_bytes()) {
            warn!(path = %self.path.display(), error = %e, "Failed to write audit log");
        }
    }
}

impl fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLog").field("path", &self.path).finish()
    }
}
