//! In-memory recording sink for tests/dev.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::context::Context;
use crate::entry::Entry;
use crate::error::{SinkError, SinkResult};
use crate::severity::Severity;
use crate::sink::Sink;

/// Owned copy of an [`Entry`] as a sink received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEntry {
    pub severity: Severity,
    pub format: &'static str,
    pub message: String,
    pub caller: String,
    pub trace: String,
    pub trace_id: String,
}

impl RecordedEntry {
    pub fn from_entry(severity: Severity, entry: &Entry<'_>) -> Self {
        Self {
            severity,
            format: entry.format(),
            message: entry.message(),
            caller: entry.caller().to_string(),
            trace: entry.trace().to_string(),
            trace_id: entry.trace_id().to_string(),
        }
    }
}

/// Sink that keeps every entry in memory, in arrival order.
///
/// - No IO
/// - A poisoned lock drops the record rather than panicking the caller
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<RecordedEntry>>,
    finalize_calls: AtomicUsize,
    finalize_error: Mutex<Option<SinkError>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<RecordedEntry> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Drain the recorded entries.
    pub fn take(&self) -> Vec<RecordedEntry> {
        self.records
            .lock()
            .map(|mut records| std::mem::take(&mut *records))
            .unwrap_or_default()
    }

    pub fn finalize_calls(&self) -> usize {
        self.finalize_calls.load(Ordering::SeqCst)
    }

    /// Make the next `finalize` return `err`.
    pub fn fail_next_finalize(&self, err: SinkError) {
        if let Ok(mut slot) = self.finalize_error.lock() {
            *slot = Some(err);
        }
    }

    fn record(&self, severity: Severity, entry: &Entry<'_>) {
        let recorded = RecordedEntry::from_entry(severity, entry);
        match self.records.lock() {
            Ok(mut records) => records.push(recorded),
            Err(_) => tracing::warn!(%severity, "memory sink lock poisoned; entry dropped"),
        }
    }
}

impl Sink for MemorySink {
    fn debug(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.record(Severity::Debug, entry);
    }

    fn info(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.record(Severity::Info, entry);
    }

    fn warn(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.record(Severity::Warn, entry);
    }

    fn error(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.record(Severity::Error, entry);
    }

    fn critical(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.record(Severity::Critical, entry);
    }

    fn finalize(&self) -> SinkResult<()> {
        self.finalize_calls.fetch_add(1, Ordering::SeqCst);
        let pending = self
            .finalize_error
            .lock()
            .map(|mut slot| slot.take())
            .unwrap_or_default();
        match pending {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
