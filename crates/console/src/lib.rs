//! `logfacade-console`: glog-style console sink.
//!
//! Every entry becomes a glog line written to a local stream (stderr unless
//! told otherwise):
//!
//! ```text
//! I1018 09:30:12.004211 4242] (trace-id) [src/orders.rs#orders::place:L88]: order accepted
//! <stack snapshot, when captured>
//! ```
//!
//! The leading letter is `I` for debug and info, `W` for warn and `E` for
//! error and critical.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{Local, NaiveDateTime};

use logfacade_core::{Context, Entry, Severity, Sink, SinkError, SinkResult};

/// Sink writing glog-formatted lines to a stream.
pub struct ConsoleSink {
    writer: Mutex<Box<dyn Write + Send>>,
    pid: u32,
}

impl ConsoleSink {
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            pid: std::process::id(),
        }
    }

    fn write(&self, severity: Severity, entry: &Entry<'_>) {
        let line = format_line(severity, Local::now().naive_local(), self.pid, entry);
        let result = match self.writer.lock() {
            Ok(mut writer) => writer.write_all(line.as_bytes()),
            Err(_) => {
                tracing::warn!(%severity, "console sink lock poisoned; entry dropped");
                return;
            }
        };
        if let Err(err) = result {
            tracing::warn!(%severity, error = %err, "console sink write failed");
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink").field("pid", &self.pid).finish_non_exhaustive()
    }
}

impl Sink for ConsoleSink {
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
            .map_err(|_| SinkError::flush("console writer lock poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}

fn severity_letter(severity: Severity) -> char {
    match severity {
        Severity::Debug | Severity::Info => 'I',
        Severity::Warn => 'W',
        Severity::Error | Severity::Critical => 'E',
    }
}

fn format_line(severity: Severity, at: NaiveDateTime, pid: u32, entry: &Entry<'_>) -> String {
    let mut line = format!(
        "{}{} {}] ({}) [{}]: {}",
        severity_letter(severity),
        at.format("%m%d %H:%M:%S%.6f"),
        pid,
        entry.trace_id(),
        entry.caller(),
        entry,
    );
    if !entry.trace().is_empty() {
        line.push('\n');
        line.push_str(entry.trace());
    }
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}
