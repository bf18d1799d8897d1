//! Correlated structured logging.
//!
//! Every request produces one [`LogEntry`] that references the trace and span
//! opened for that request, so the log line and the span can be joined in the
//! backend. Entries are serialized in the Cloud Logging structured-log shape
//! and shipped one JSON object per line.
//!
//! # Data Flow
//! ```text
//! CorrelatedLogger::log
//!     → LogEntry (severity, message, trace reference, span id)
//!     → LogSink::submit (non-blocking)
//!     → ChannelLogSink → mpsc → LogWriter task → stdout
//! ```

use std::io;
use std::sync::Arc;

use opentelemetry::trace::TraceId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::observability::spans::RequestSpan;

/// Log entry severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Error,
}

/// One correlated log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,

    /// `projects/<project>/traces/<trace-id>`
    #[serde(rename = "logging.googleapis.com/trace")]
    pub trace: String,

    #[serde(rename = "logging.googleapis.com/spanId")]
    pub span_id: String,

    #[serde(rename = "logging.googleapis.com/trace_sampled")]
    pub trace_sampled: bool,
}

/// Format the backend's fully-qualified trace name.
pub fn trace_reference(project_id: &str, trace_id: TraceId) -> String {
    format!("projects/{}/traces/{}", project_id, trace_id)
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log writer has shut down")]
    Closed,
}

/// Destination for correlated entries.
///
/// Implementations must not block the caller on delivery.
pub trait LogSink: Send + Sync {
    fn submit(&self, entry: LogEntry) -> Result<(), SinkError>;
}

/// Builds correlated entries and hands them to a [`LogSink`].
#[derive(Clone)]
pub struct CorrelatedLogger {
    project_id: Arc<str>,
    sink: Arc<dyn LogSink>,
}

impl CorrelatedLogger {
    pub fn new(project_id: impl Into<Arc<str>>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            project_id: project_id.into(),
            sink,
        }
    }

    /// Log `message` against the trace and span of `span`.
    ///
    /// Delivery is best effort: a failed submission is reported as a
    /// diagnostic and otherwise ignored.
    pub fn log(&self, span: &RequestSpan, severity: Severity, message: &str) {
        let entry = LogEntry {
            severity,
            message: message.to_string(),
            trace: trace_reference(&self.project_id, span.trace_id()),
            span_id: span.span_id().to_string(),
            trace_sampled: span.is_sampled(),
        };

        if let Err(e) = self.sink.submit(entry) {
            tracing::warn!(error = %e, ?severity, "Dropped correlated log entry");
        }
    }
}

enum Message {
    Entry(LogEntry),
    Shutdown,
}

/// Sink that queues entries for the background [`LogShipper`] writer.
#[derive(Clone)]
pub struct ChannelLogSink {
    tx: mpsc::UnboundedSender<Message>,
}

impl LogSink for ChannelLogSink {
    fn submit(&self, entry: LogEntry) -> Result<(), SinkError> {
        self.tx
            .send(Message::Entry(entry))
            .map_err(|_| SinkError::Closed)
    }
}

/// Wire shape: the entry plus the log name label.
#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(flatten)]
    entry: &'a LogEntry,

    #[serde(rename = "logging.googleapis.com/labels")]
    labels: Labels<'a>,
}

#[derive(Serialize)]
struct Labels<'a> {
    log_name: &'a str,
}

/// Background task writing queued entries as JSON lines.
pub struct LogShipper<W> {
    tx: mpsc::UnboundedSender<Message>,
    handle: JoinHandle<W>,
}

impl<W> LogShipper<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Spawn the writer task on the current runtime.
    pub fn spawn(writer: W, log_name: impl Into<String>) -> (ChannelLogSink, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(write_entries(rx, writer, log_name.into()));

        (ChannelLogSink { tx: tx.clone() }, Self { tx, handle })
    }

    /// Write out everything queued so far, flush, and stop the writer.
    ///
    /// Entries submitted after this call are rejected with
    /// [`SinkError::Closed`]. Returns the underlying writer.
    pub async fn shutdown(self) -> io::Result<W> {
        // A send error means the writer already exited; the join below reports why.
        let _ = self.tx.send(Message::Shutdown);
        self.handle.await.map_err(io::Error::other)
    }
}

async fn write_entries<W>(
    mut rx: mpsc::UnboundedReceiver<Message>,
    mut writer: W,
    log_name: String,
) -> W
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let entry = match message {
            Message::Entry(entry) => entry,
            Message::Shutdown => break,
        };

        let envelope = Envelope {
            entry: &entry,
            labels: Labels {
                log_name: &log_name,
            },
        };
        let mut line = match serde_json::to_vec(&envelope) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode log entry");
                continue;
            }
        };
        line.push(b'\n');

        if let Err(e) = write_line(&mut writer, &line).await {
            tracing::warn!(error = %e, "Failed to write log entry");
        }
    }

    // Late submissions fail fast from here on instead of piling up.
    drop(rx);
    if let Err(e) = writer.flush().await {
        tracing::warn!(error = %e, "Failed to flush log writer");
    }
    writer
}

async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &[u8]) -> io::Result<()> {
    writer.write_all(line).await?;
    writer.flush().await
}
