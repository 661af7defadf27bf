//! Cloud sink errors.

use logfacade_core::SinkError;

#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("failed to build logging client: {0}")]
    Client(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("write rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CloudError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

impl From<CloudError> for SinkError {
    fn from(value: CloudError) -> Self {
        SinkError::transport(value.to_string())
    }
}
