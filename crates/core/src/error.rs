//! Sink error model.

use thiserror::Error;

/// Result type returned by [`Sink::finalize`](crate::Sink::finalize).
pub type SinkResult<T> = Result<T, SinkError>;

/// Failure reported by a sink when it releases its resources.
///
/// Individual log calls never fail; this type only travels out of `finalize`.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Buffered output could not be written out.
    #[error("flush failed: {0}")]
    Flush(String),

    /// The backend handle could not be closed cleanly.
    #[error("close failed: {0}")]
    Close(String),

    /// Underlying stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A remote backend rejected or could not receive the request.
    #[error("transport error: {0}")]
    Transport(String),
}

impl SinkError {
    pub fn flush(msg: impl Into<String>) -> Self {
        Self::Flush(msg.into())
    }

    pub fn close(msg: impl Into<String>) -> Self {
        Self::Close(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
