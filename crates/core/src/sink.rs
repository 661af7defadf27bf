//! Backend contract.

use std::sync::Arc;

use crate::context::Context;
use crate::entry::Entry;
use crate::error::SinkResult;
use crate::severity::Severity;

/// A backend able to record entries at each severity.
///
/// ## Contract
///
/// - Log calls are best-effort and infallible: a sink that cannot record an
///   entry deals with it internally (dropping it, reporting it through
///   `tracing`), it never fails the caller.
/// - Implementations must be safe to call from many threads at once.
/// - `finalize` releases held resources (flushes buffers, closes clients) and
///   is the only place errors come out. Calling it twice should be harmless.
///
/// Entries borrow the caller's arguments; anything kept past the call must be
/// copied out.
pub trait Sink: Send + Sync {
    fn debug(&self, ctx: &Context, entry: &Entry<'_>);

    fn info(&self, ctx: &Context, entry: &Entry<'_>);

    fn warn(&self, ctx: &Context, entry: &Entry<'_>);

    fn error(&self, ctx: &Context, entry: &Entry<'_>);

    fn critical(&self, ctx: &Context, entry: &Entry<'_>);

    fn finalize(&self) -> SinkResult<()>;

    /// Route `entry` to the method matching `severity`.
    fn log(&self, ctx: &Context, severity: Severity, entry: &Entry<'_>) {
        match severity {
            Severity::Debug => self.debug(ctx, entry),
            Severity::Info => self.info(ctx, entry),
            Severity::Warn => self.warn(ctx, entry),
            Severity::Error => self.error(ctx, entry),
            Severity::Critical => self.critical(ctx, entry),
        }
    }
}

impl<S> Sink for Arc<S>
where
    S: Sink + ?Sized,
{
    fn debug(&self, ctx: &Context, entry: &Entry<'_>) {
        (**self).debug(ctx, entry)
    }

    fn info(&self, ctx: &Context, entry: &Entry<'_>) {
        (**self).info(ctx, entry)
    }

    fn warn(&self, ctx: &Context, entry: &Entry<'_>) {
        (**self).warn(ctx, entry)
    }

    fn error(&self, ctx: &Context, entry: &Entry<'_>) {
        (**self).error(ctx, entry)
    }

    fn critical(&self, ctx: &Context, entry: &Entry<'_>) {
        (**self).critical(ctx, entry)
    }

    fn finalize(&self) -> SinkResult<()> {
        (**self).finalize()
    }
}

impl<S> Sink for Box<S>
where
    S: Sink + ?Sized,
{
    fn debug(&self, ctx: &Context, entry: &Entry<'_>) {
        (**self).debug(ctx, entry)
    }

    fn info(&self, ctx: &Context, entry: &Entry<'_>) {
        (**self).info(ctx, entry)
    }

    fn warn(&self, ctx: &Context, entry: &Entry<'_>) {
        (**self).warn(ctx, entry)
    }

    fn error(&self, ctx: &Context, entry: &Entry<'_>) {
        (**self).error(ctx, entry)
    }

    fn critical(&self, ctx: &Context, entry: &Entry<'_>) {
        (**self).critical(ctx, entry)
    }

    fn finalize(&self) -> SinkResult<()> {
        (**self).finalize()
    }
}
