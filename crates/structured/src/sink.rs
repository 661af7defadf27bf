//! Leveled structured sink.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Utc;

use logfacade_core::{Context, Entry, Severity, Sink, SinkError, SinkResult};

use crate::config::StructuredConfig;
use crate::formatter::LogRecord;

/// Sink formatting entries with a [`Formatter`](crate::Formatter) and writing
/// them to a stream (stderr by default).
///
/// Critical entries are recorded at `error` level; the level filter still
/// compares the entry's own severity.
pub struct StructuredSink {
    config: StructuredConfig,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl StructuredSink {
    pub fn new(config: StructuredConfig) -> Self {
        Self::with_writer(config, io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(config: StructuredConfig, writer: W) -> Self {
        Self {
            config,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn config(&self) -> &StructuredConfig {
        &self.config
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        severity >= self.config.level
    }

    fn write(&self, severity: Severity, entry: &Entry<'_>) {
        if !self.enabled(severity) {
            return;
        }

        let level = match severity {
            Severity::Critical => Severity::Error,
            other => other,
        };
        let record = LogRecord::from_entry(Utc::now(), level, entry);
        let bytes = match self.config.formatter.format(&record) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(%severity, error = %err, "structured sink could not format entry");
                return;
            }
        };

        let result = match self.writer.lock() {
            Ok(mut writer) => writer.write_all(&bytes),
            Err(_) => {
                tracing::warn!(%severity, "structured sink lock poisoned; entry dropped");
                return;
            }
        };
        if let Err(err) = result {
            tracing::warn!(%severity, error = %err, "structured sink write failed");
        }
    }
}

impl std::fmt::Debug for StructuredSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredSink")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Sink for StructuredSink {
    fn debug(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.write(Severity::Debug, entry);
    }

    fn info(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.write(Severity::Info, entry);
    }

    fn warn(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.write(Severity::Warn, entry);
    }

    fn error(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.write(Severity::Error, entry);
    }

    fn critical(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.write(Severity::Critical, entry);
    }

    fn finalize(&self) -> SinkResult<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::flush("structured writer lock poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}
