//! Process-wide `tracing` setup and a sink that logs into it.

/// Initialize process-wide tracing/logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init();
}

/// Subscriber configuration (filters, layers).
pub mod subscriber;

/// Facade sink forwarding entries to `tracing`.
pub mod sink;

pub use sink::{TRACING_TARGET, TracingSink};
pub use subscriber::init_with_filter;
