//! `logfacade-structured`: leveled structured sink with pluggable formatters.
//!
//! Entries become [`LogRecord`]s (time, level, message, extra fields) that a
//! [`Formatter`] turns into bytes. Entries below the configured minimum
//! severity are dropped before formatting.

pub mod config;
pub mod formatter;
pub mod sink;

pub use config::StructuredConfig;
pub use formatter::{FormatError, Formatter, JsonFormatter, LogRecord, TextFormatter};
pub use sink::StructuredSink;
