//! `logfacade-core`: the logging facade itself.
//!
//! Callers log through a [`Logger`]; the logger enriches every message with the
//! call site, a trace identifier pulled from the request [`Context`] and
//! (optionally) a stack snapshot, then hands the resulting [`Entry`] to a
//! pluggable [`Sink`].
//!
//! ```
//! use std::sync::Arc;
//! use logfacade_core::{Context, Logger, MemorySink, infof};
//!
//! let sink = Arc::new(MemorySink::new());
//! let logger = Logger::new(Arc::clone(&sink));
//!
//! infof!(logger, &Context::new(), "value={}", 42);
//! assert_eq!(sink.records()[0].message, "value=42");
//! ```

pub mod context;
pub mod entry;
pub mod error;
pub mod logger;
pub mod memory;
pub mod severity;
pub mod sink;

pub use context::{Context, TraceId, extract_trace_id};
pub use entry::{CallSite, Entry, MAX_TRACE_BYTES};
pub use error::{SinkError, SinkResult};
pub use logger::{CRITICAL_FORMAT, Logger, TraceIdExtractor};
pub use memory::{MemorySink, RecordedEntry};
pub use severity::{ParseSeverityError, Severity};
pub use sink::Sink;
