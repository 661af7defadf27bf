use logfacade_core::{Context, Entry, Sink, SinkResult};
use tracing::Level;

/// Target every forwarded event is emitted under.
pub const TRACING_TARGET: &str = "logfacade";

/// Sink bridging facade entries into the `tracing` ecosystem.
///
/// Each entry becomes one event carrying `trace_id`, `caller` and `stack`
/// fields. `tracing` has no critical level, so critical entries are emitted
/// at `ERROR` with `critical = true`. Whatever subscriber is installed decides
/// where they end up.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

macro_rules! forward {
    ($level:expr, $entry:expr, $critical:expr) => {
        tracing::event!(
            target: TRACING_TARGET,
            $level,
            trace_id = $entry.trace_id(),
            caller = $entry.caller(),
            stack = $entry.trace(),
            critical = $critical,
            "{}",
            $entry
        )
    };
}

impl Sink for TracingSink {
    fn debug(&self, _ctx: &Context, entry: &Entry<'_>) {
        forward!(Level::DEBUG, entry, false);
    }

    fn info(&self, _ctx: &Context, entry: &Entry<'_>) {
        forward!(Level::INFO, entry, false);
    }

    fn warn(&self, _ctx: &Context, entry: &Entry<'_>) {
        forward!(Level::WARN, entry, false);
    }

    fn error(&self, _ctx: &Context, entry: &Entry<'_>) {
        forward!(Level::ERROR, entry, false);
    }

    fn critical(&self, _ctx: &Context, entry: &Entry<'_>) {
        forward!(Level::ERROR, entry, true);
    }

    /// Nothing is buffered here; flushing belongs to the subscriber.
    fn finalize(&self) -> SinkResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    use logfacade_core::{Logger, critical, debugf_no_trace, infof, warnf};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedBuffer {
        type Writer = SharedBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(run: impl FnOnce()) -> Vec<serde_json::Value> {
        let buffer = SharedBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(Level::DEBUG)
            .with_writer(buffer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, run);

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn forwards_entries_with_fields() {
        let events = capture(|| {
            let logger = Logger::new(TracingSink::new())
                .with_trace_id_extractor(|_| "abc123".to_string());
            let ctx = Context::new();
            debugf_no_trace!(logger, &ctx, "value={}", 42);
            warnf!(logger, &ctx, "slow");
        });

        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["level"], "DEBUG");
        assert_eq!(events[0]["target"], TRACING_TARGET);
        assert_eq!(events[0]["fields"]["message"], "value=42");
        assert_eq!(events[0]["fields"]["trace_id"], "abc123");
        assert_eq!(events[0]["fields"]["stack"], "");
        assert_eq!(events[0]["fields"]["critical"], false);
        assert!(
            events[0]["fields"]["caller"]
                .as_str()
                .unwrap()
                .contains("#tests::forwards_entries_with_fields:L")
        );
        assert_eq!(events[1]["level"], "WARN");
        assert_ne!(events[1]["fields"]["stack"], "");
    }

    #[test]
    fn critical_is_flagged_at_error_level() {
        let events = capture(|| {
            let logger = Logger::new(TracingSink);
            let err = io::Error::other("replica lagging");
            critical!(logger, &Context::new(), "failover", err);
            infof!(logger, &Context::new(), "after");
        });

        assert_eq!(events[0]["level"], "ERROR");
        assert_eq!(events[0]["fields"]["critical"], true);
        assert!(
            events[0]["fields"]["message"]
                .as_str()
                .unwrap()
                .starts_with("failover\nreplica lagging")
        );
        assert_eq!(events[1]["level"], "INFO");
    }

    #[test]
    fn finalize_is_a_no_op() {
        assert!(Logger::new(TracingSink).finalize().is_ok());
    }
}
