//! The logging facade.
//!
//! [`Logger`] is the single entry point application code logs through. It owns
//! one [`Sink`] and, optionally, a function pulling a trace identifier out of
//! the request [`Context`]. Every call builds an [`Entry`] and hands it to the
//! sink synchronously; the logger never buffers, retries, drops or reorders.
//!
//! Logging calls return nothing and cannot fail the caller. Only
//! [`Logger::finalize`] reports an error, and it is the sink's error verbatim.
//!
//! The macros ([`debugf!`](crate::debugf), [`infof!`](crate::infof), ...) are
//! the usual way in: they capture the call site and the format template so
//! the sink sees the caller's file, function and line.

use std::fmt;
use std::error::Error;
use std::sync::Arc;

use crate::context::Context;
use crate::entry::{CallSite, Entry};
use crate::error::SinkResult;
use crate::sink::Sink;

/// Template recorded on entries built by [`Logger::critical`].
pub const CRITICAL_FORMAT: &str = "{}\n{:#}";

/// Pulls a trace identifier out of a request context.
pub type TraceIdExtractor = Arc<dyn Fn(&Context) -> String + Send + Sync>;

/// Logging facade over a pluggable [`Sink`].
///
/// Cloning is cheap; clones share the sink and the extractor.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn Sink>,
    extract_trace_id: Option<TraceIdExtractor>,
}

impl Logger {
    pub fn new<S: Sink + 'static>(sink: S) -> Self {
        Self::from_arc(Arc::new(sink))
    }

    pub fn from_arc(sink: Arc<dyn Sink>) -> Self {
        Self {
            sink,
            extract_trace_id: None,
        }
    }

    /// Resolve trace identifiers with `extract` instead of leaving them empty.
    pub fn with_trace_id_extractor<F>(mut self, extract: F) -> Self
    where
        F: Fn(&Context) -> String + Send + Sync + 'static,
    {
        self.extract_trace_id = Some(Arc::new(extract));
        self
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    pub fn debugf(
        &self,
        ctx: &Context,
        site: CallSite,
        format: &'static str,
        args: fmt::Arguments<'_>,
    ) {
        self.sink
            .debug(ctx, &Entry::capture(self.trace_id(ctx), site, format, args));
    }

    /// Like [`Logger::debugf`] but skips the stack snapshot.
    pub fn debugf_no_trace(
        &self,
        ctx: &Context,
        site: CallSite,
        format: &'static str,
        args: fmt::Arguments<'_>,
    ) {
        self.sink
            .debug(ctx, &Entry::without_trace(self.trace_id(ctx), site, format, args));
    }

    pub fn infof(
        &self,
        ctx: &Context,
        site: CallSite,
        format: &'static str,
        args: fmt::Arguments<'_>,
    ) {
        self.sink
            .info(ctx, &Entry::capture(self.trace_id(ctx), site, format, args));
    }

    pub fn warnf(
        &self,
        ctx: &Context,
        site: CallSite,
        format: &'static str,
        args: fmt::Arguments<'_>,
    ) {
        self.sink
            .warn(ctx, &Entry::capture(self.trace_id(ctx), site, format, args));
    }

    pub fn errorf(
        &self,
        ctx: &Context,
        site: CallSite,
        format: &'static str,
        args: fmt::Arguments<'_>,
    ) {
        self.sink
            .error(ctx, &Entry::capture(self.trace_id(ctx), site, format, args));
    }

    /// Log `summary` followed by `err` and its chain of sources.
    pub fn critical(&self, ctx: &Context, site: CallSite, summary: &str, err: &dyn Error) {
        self.sink.critical(
            ctx,
            &Entry::capture(
                self.trace_id(ctx),
                site,
                CRITICAL_FORMAT,
                format_args!("{}\n{:#}", summary, ErrorReport(err)),
            ),
        );
    }

    /// Release the sink. Its result is returned unchanged.
    pub fn finalize(&self) -> SinkResult<()> {
        self.sink.finalize()
    }

    fn trace_id(&self, ctx: &Context) -> String {
        self.extract_trace_id
            .as_ref()
            .map(|extract| extract(ctx))
            .unwrap_or_default()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("extract_trace_id", &self.extract_trace_id.is_some())
            .finish_non_exhaustive()
    }
}

/// Renders an error; the alternate form (`{:#}`) appends each source on its
/// own `caused by:` line.
struct ErrorReport<'a>(&'a dyn Error);

impl fmt::Display for ErrorReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        if f.alternate() {
            let mut source = self.0.source();
            while let Some(cause) = source {
                write!(f, "\ncaused by: {}", cause)?;
                source = cause.source();
            }
        }
        Ok(())
    }
}

#[macro_export]
macro_rules! debugf {
    ($logger:expr, $ctx:expr, $fmt:tt $($arg:tt)*) => {
        $logger.debugf($ctx, $crate::call_site!(), $fmt, ::core::format_args!($fmt $($arg)*))
    };
}

/// Debug-level log without a stack snapshot, for hot paths.
#[macro_export]
macro_rules! debugf_no_trace {
    ($logger:expr, $ctx:expr, $fmt:tt $($arg:tt)*) => {
        $logger.debugf_no_trace($ctx, $crate::call_site!(), $fmt, ::core::format_args!($fmt $($arg)*))
    };
}

#[macro_export]
macro_rules! infof {
    ($logger:expr, $ctx:expr, $fmt:tt $($arg:tt)*) => {
        $logger.infof($ctx, $crate::call_site!(), $fmt, ::core::format_args!($fmt $($arg)*))
    };
}

#[macro_export]
macro_rules! warnf {
    ($logger:expr, $ctx:expr, $fmt:tt $($arg:tt)*) => {
        $logger.warnf($ctx, $crate::call_site!(), $fmt, ::core::format_args!($fmt $($arg)*))
    };
}

#[macro_export]
macro_rules! errorf {
    ($logger:expr, $ctx:expr, $fmt:tt $($arg:tt)*) => {
        $logger.errorf($ctx, $crate::call_site!(), $fmt, ::core::format_args!($fmt $($arg)*))
    };
}

/// `critical!(logger, &ctx, "summary", err)` where `err` implements
/// `std::error::Error`.
///
/// The macro borrows `err`, so a boxed error is passed dereferenced:
/// `critical!(logger, &ctx, "summary", *boxed)`.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $ctx:expr, $summary:expr, $err:expr $(,)?) => {
        $logger.critical($ctx, $crate::call_site!(), $summary, &$err)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;
    use crate::memory::MemorySink;
    use crate::severity::Severity;
    use crate::context::extract_trace_id;

    #[derive(Debug, thiserror::Error)]
    #[error("query failed")]
    struct QueryError {
        #[source]
        source: std::io::Error,
    }

    fn logger() -> (Arc<MemorySink>, Logger) {
        let sink = Arc::new(MemorySink::new());
        (Arc::clone(&sink), Logger::new(Arc::clone(&sink)))
    }

    #[test]
    fn info_without_extractor_has_empty_trace_id() {
        let (sink, logger) = logger();
        infof!(logger, &Context::new(), "value={}", 42);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Info);
        assert_eq!(records[0].message, "value=42");
        assert_eq!(records[0].format, "value={}");
        assert_eq!(records[0].trace_id, "");
    }

    #[test]
    fn error_with_extractor_carries_trace_id() {
        let (sink, logger) = logger();
        let logger = logger.with_trace_id_extractor(|_| "abc123".to_string());
        errorf!(logger, &Context::new(), "fail: {}", "boom");

        let records = sink.records();
        assert_eq!(records[0].severity, Severity::Error);
        assert_eq!(records[0].trace_id, "abc123");
        assert_eq!(records[0].message, "fail: boom");
    }

    #[test]
    fn extractor_sees_the_request_context() {
        let (sink, logger) = logger();
        let logger = logger.with_trace_id_extractor(extract_trace_id);

        warnf!(logger, &Context::new().with_trace_id("req-7"), "slow");
        warnf!(logger, &Context::new(), "slow");

        let records = sink.records();
        assert_eq!(records[0].trace_id, "req-7");
        assert_eq!(records[1].trace_id, "");
    }

    #[test]
    fn leveled_calls_capture_traces_except_no_trace() {
        let (sink, logger) = logger();
        let ctx = Context::new();
        debugf!(logger, &ctx, "d");
        debugf_no_trace!(logger, &ctx, "quiet {}", 1);
        infof!(logger, &ctx, "i");
        warnf!(logger, &ctx, "w");
        errorf!(logger, &ctx, "e");

        let records = sink.records();
        let severities: Vec<Severity> = records.iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Debug,
                Severity::Debug,
                Severity::Info,
                Severity::Warn,
                Severity::Error
            ]
        );
        assert!(!records[0].trace.is_empty());
        assert!(records[1].trace.is_empty());
        assert_eq!(records[1].message, "quiet 1");
        assert!(records[2..].iter().all(|r| !r.trace.is_empty()));
    }

    fn function_of(caller: &str) -> &str {
        caller
            .split('#')
            .nth(1)
            .and_then(|rest| rest.split(":L").next())
            .unwrap_or_default()
    }

    #[test]
    fn caller_points_at_the_call_site() {
        let (sink, logger) = logger();
        let ctx = Context::new();
        let err = std::io::Error::other("gone");
        let first = line!() + 1;
        debugf!(logger, &ctx, "d");
        debugf_no_trace!(logger, &ctx, "n");
        infof!(logger, &ctx, "i");
        warnf!(logger, &ctx, "w");
        errorf!(logger, &ctx, "e");
        critical!(logger, &ctx, "c", err);

        let records = sink.records();
        assert_eq!(records.len(), 6);
        for (offset, record) in records.iter().enumerate() {
            let caller = &record.caller;
            let line = first + offset as u32;
            assert!(caller.starts_with(file!()), "{caller}");
            assert!(caller.ends_with(&format!(":L{line}")), "{caller}");
            assert_eq!(
                function_of(caller),
                "tests::caller_points_at_the_call_site",
                "{caller}"
            );
        }
    }

    #[test]
    fn direct_calls_fall_back_to_the_callers_location() {
        let (sink, logger) = logger();
        let line = line!() + 1;
        logger.infof(&Context::new(), CallSite::caller(), "direct", format_args!("direct"));

        let caller = sink.records()[0].caller.clone();
        assert_eq!(caller, format!("{}:L{line}", file!()));
    }

    #[test]
    fn macros_accept_named_and_trailing_arguments() {
        let (sink, logger) = logger();
        let user = "ada";
        infof!(logger, &Context::new(), "hello {user} #{n}", n = 3,);

        assert_eq!(sink.records()[0].message, "hello ada #3");
    }

    #[test]
    fn critical_renders_summary_and_error_chain() {
        let (sink, logger) = logger();
        let logger = logger.with_trace_id_extractor(|_| "t-9".to_string());
        let err = QueryError {
            source: std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timed out"),
        };
        critical!(logger, &Context::new(), "could not load orders", err);

        let record = &sink.records()[0];
        assert_eq!(record.severity, Severity::Critical);
        assert_eq!(record.format, CRITICAL_FORMAT);
        assert_eq!(record.trace_id, "t-9");
        assert_eq!(
            record.message,
            "could not load orders\nquery failed\ncaused by: socket timed out"
        );
        assert!(!record.trace.is_empty());
    }

    #[test]
    fn critical_accepts_a_dereferenced_boxed_error() {
        let (sink, logger) = logger();
        let boxed: Box<dyn Error + Send + Sync> = Box::new(QueryError {
            source: std::io::Error::other("disk full"),
        });
        critical!(logger, &Context::new(), "export aborted", *boxed);

        assert_eq!(
            sink.records()[0].message,
            "export aborted\nquery failed\ncaused by: disk full"
        );
    }

    #[test]
    fn finalize_passes_sink_result_through() {
        let (sink, logger) = logger();
        assert!(logger.finalize().is_ok());

        sink.fail_next_finalize(SinkError::close("connection reset"));
        let err = logger.finalize().unwrap_err();
        assert!(matches!(err, SinkError::Close(ref msg) if msg == "connection reset"));
        assert_eq!(sink.finalize_calls(), 2);
    }

    #[test]
    fn clones_share_the_sink() {
        let (sink, logger) = logger();
        let cloned = logger.clone();
        infof!(logger, &Context::new(), "a");
        infof!(cloned, &Context::new(), "b");

        assert_eq!(sink.records().len(), 2);
    }

    #[test]
    fn logger_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Logger>();
    }

    #[test]
    fn debug_output_hides_the_extractor() {
        let (_, logger) = logger();
        let logger = logger.with_trace_id_extractor(|_| String::new());
        assert_eq!(format!("{logger:?}"), "Logger { extract_trace_id: true, .. }");
    }
}
