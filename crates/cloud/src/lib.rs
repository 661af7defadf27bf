//! `logfacade-cloud`: Cloud Logging sink.
//!
//! Entries are mapped onto Cloud Logging `LogEntry` objects tagged with the
//! service's monitored resource (project/service/version) and a trace path
//! (`projects/{project}/traces/{trace_id}`) that lines them up with request
//! logs. They are buffered and written in batches through a [`Transport`];
//! [`HttpTransport`] talks to the `entries:write` REST endpoint.
//!
//! ## Finalize
//!
//! `finalize` flushes whatever is buffered and closes the transport before
//! returning, reporting the first failure. It does not hand the flush to a
//! background task.
//!
//! ```rust,no_run
//! use logfacade_cloud::{CloudConfig, CloudSink, Credentials};
//! use logfacade_core::{Context, Logger, extract_trace_id, infof};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CloudConfig::from_env("gae_app", "app_logs")?;
//! let sink = CloudSink::connect(config, Credentials::bearer("ya29.token"))?;
//! let logger = Logger::new(sink).with_trace_id_extractor(extract_trace_id);
//!
//! infof!(logger, &Context::new().with_trace_id("abc"), "started");
//! logger.finalize()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod sink;
pub mod transport;
pub mod wire;

pub use config::CloudConfig;
pub use error::CloudError;
pub use sink::{CloudSink, DEFAULT_BATCH_SIZE};
pub use transport::{Credentials, DEFAULT_ENDPOINT, HttpTransport, Transport};
pub use wire::{MonitoredResource, Payload, WireEntry, WireSeverity, WriteRequest};
