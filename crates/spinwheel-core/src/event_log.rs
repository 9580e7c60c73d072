//! Fire-and-forget, append-only log of emitted spin events.
//!
//! [`EventLogger::append`] only enqueues; a background task owns the
//! file and writes one JSON line per event. Write failures are reported
//! through `tracing` and never reach the request that produced the
//! event. Nothing in this system reads the log back.

use std::path::{Path, PathBuf};

use spinwheel_types::SpinEvent;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Work items for the writer task.
#[derive(Debug)]
enum LogCommand {
    Append(SpinEvent),
    Close,
}

/// Cloneable handle for appending to the spin event log.
///
/// The writer task exits after [`close`](Self::close) is called, or after
/// every handle is dropped, once everything queued before that point
/// has been written.
#[derive(Debug, Clone)]
pub struct EventLogger {
    tx: mpsc::UnboundedSender<LogCommand>,
}

impl EventLogger {
    /// Start the writer task for `path`.
    ///
    /// Must be called from within a Tokio runtime. The returned
    /// [`JoinHandle`] completes once the queue is closed and drained.
    pub fn spawn(path: impl Into<PathBuf>) -> (Self, JoinHandle<()>) {
        let path = path.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(path, rx));
        (Self { tx }, handle)
    }

    /// Queue `event` for writing. Never blocks and never fails the caller.
    pub fn append(&self, event: &SpinEvent) {
        if self.tx.send(LogCommand::Append(event.clone())).is_err() {
            warn!("Event log writer is gone, dropping spin event");
        }
    }

    /// Ask the writer to stop after draining what is already queued.
    ///
    /// Events appended afterwards are dropped with a warning.
    pub fn close(&self) {
        if self.tx.send(LogCommand::Close).is_err() {
            debug!("Event log writer already stopped");
        }
    }
}

async fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<LogCommand>) {
    debug!(path = %path.display(), "Event log writer started");

    while let Some(LogCommand::Append(event)) = rx.recv().await {
        if let Err(e) = append_line(&path, &event).await {
            error!(path = %path.display(), error = %e, "Error writing event log");
        }
    }

    debug!(path = %path.display(), "Event log writer stopped");
}

async fn append_line(path: &Path, event: &SpinEvent) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(event)?;
    line.push(b'\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(&line).await?;
    file.flush().await
}
