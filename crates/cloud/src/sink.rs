//! Buffered Cloud Logging sink.

use std::sync::{Mutex, PoisonError, RwLock};

use chrono::Utc;

use logfacade_core::{Context, Entry, Severity, Sink, SinkError, SinkResult};

use crate::config::CloudConfig;
use crate::error::CloudError;
use crate::transport::{Credentials, HttpTransport, Transport};
use crate::wire::{WireEntry, WriteRequest};

/// Entries buffered before a write is issued.
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Default)]
struct State {
    buffer: Vec<WireEntry>,
    closed: bool,
}

/// Sink writing entries to Cloud Logging in batches.
///
/// The buffer lock is only held to push an entry or take a full batch; the
/// write itself runs unlocked on the thread whose entry filled the batch, so
/// other threads keep logging while it is in flight. Batches sent from
/// different threads may overlap; every entry carries its own timestamp.
/// Failed writes are reported through `tracing` and the batch is dropped.
///
/// `finalize` waits for in-flight writes, flushes synchronously and reports
/// failures to the caller. Entries logged after `finalize` are dropped.
pub struct CloudSink {
    config: CloudConfig,
    transport: Box<dyn Transport>,
    batch_size: usize,
    state: Mutex<State>,
    // Writers share it; finalize takes it exclusively before closing.
    in_flight: RwLock<()>,
}

impl CloudSink {
    /// Validate `config` and connect over HTTP.
    pub fn connect(config: CloudConfig, credentials: Credentials) -> Result<Self, CloudError> {
        config.validate()?;
        let transport = HttpTransport::new(credentials)?;
        Self::with_transport(config, transport)
    }

    pub fn with_transport<T: Transport + 'static>(
        config: CloudConfig,
        transport: T,
    ) -> Result<Self, CloudError> {
        config.validate()?;
        Ok(Self {
            config,
            transport: Box::new(transport),
            batch_size: DEFAULT_BATCH_SIZE,
            state: Mutex::new(State::default()),
            in_flight: RwLock::new(()),
        })
    }

    /// Number of entries per write. Values below 1 are treated as 1.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// Entries waiting for the next write.
    pub fn pending(&self) -> usize {
        self.state.lock().map(|state| state.buffer.len()).unwrap_or(0)
    }

    /// Write out everything buffered now.
    pub fn flush(&self) -> Result<(), CloudError> {
        let _writing = self.in_flight.read().unwrap_or_else(PoisonError::into_inner);
        let batch = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| CloudError::transport("cloud sink lock poisoned"))?;
            std::mem::take(&mut state.buffer)
        };
        self.write(batch)
    }

    fn write(&self, batch: Vec<WireEntry>) -> Result<(), CloudError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.transport.write_entries(&WriteRequest::new(batch))
    }

    fn log(&self, severity: Severity, entry: &Entry<'_>) {
        let wire = WireEntry::from_entry(&self.config, severity, Utc::now(), entry);

        // Taken before the buffer lock so finalize cannot close the transport
        // between taking a batch and writing it.
        let _writing = self.in_flight.read().unwrap_or_else(PoisonError::into_inner);
        let batch = {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(_) => {
                    tracing::warn!(%severity, "cloud sink lock poisoned; entry dropped");
                    return;
                }
            };
            if state.closed {
                tracing::warn!(%severity, "cloud sink already finalized; entry dropped");
                return;
            }

            state.buffer.push(wire);
            if state.buffer.len() < self.batch_size {
                return;
            }
            std::mem::take(&mut state.buffer)
        };

        let entries = batch.len();
        if let Err(err) = self.write(batch) {
            tracing::warn!(error = %err, entries, "cloud sink dropped a batch");
        }
    }
}

impl std::fmt::Debug for CloudSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudSink")
            .field("config", &self.config)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Sink for CloudSink {
    fn debug(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.log(Severity::Debug, entry);
    }

    fn info(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.log(Severity::Info, entry);
    }

    fn warn(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.log(Severity::Warn, entry);
    }

    fn error(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.log(Severity::Error, entry);
    }

    fn critical(&self, _ctx: &Context, entry: &Entry<'_>) {
        self.log(Severity::Critical, entry);
    }

    /// Wait for in-flight writes, flush, then close the transport even if the
    /// flush failed. The flush failure wins when both fail.
    fn finalize(&self) -> SinkResult<()> {
        let _exclusive = self.in_flight.write().unwrap_or_else(PoisonError::into_inner);
        let batch = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| SinkError::flush("cloud sink lock poisoned"))?;
            if state.closed {
                return Ok(());
            }
            state.closed = true;
            std::mem::take(&mut state.buffer)
        };

        let flushed = self.write(batch);
        let closed = self.transport.close();
        match (flushed, closed) {
            (Err(err), _) => Err(SinkError::flush(err.to_string())),
            (Ok(()), Err(err)) => Err(SinkError::close(err.to_string())),
            (Ok(()), Ok(())) => Ok(()),
        }
    }
}
