//! How write requests leave the process.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::CloudError;
use crate::wire::WriteRequest;

/// Cloud Logging REST endpoint for batched writes.
pub const DEFAULT_ENDPOINT: &str = "https://logging.googleapis.com/v2/entries:write";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Delivery of write requests to the logging backend.
///
/// Implementations must be safe to share across threads. `close` is called
/// once, from `finalize`.
pub trait Transport: Send + Sync {
    fn write_entries(&self, request: &WriteRequest) -> Result<(), CloudError>;

    fn close(&self) -> Result<(), CloudError> {
        Ok(())
    }
}

/// OAuth2 bearer credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_token: String,
}

impl Credentials {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Blocking HTTP transport for the `entries:write` endpoint.
///
/// Uses `reqwest`'s blocking client, so it must not be driven from inside an
/// async runtime's worker thread.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(credentials: Credentials) -> Result<Self, CloudError> {
        if credentials.access_token.trim().is_empty() {
            return Err(CloudError::config("access token is required"));
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CloudError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials,
        })
    }

    /// Point at a different endpoint (emulators, proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn write_entries(&self, request: &WriteRequest) -> Result<(), CloudError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.credentials.access_token)
            .json(request)
            .send()
            .map_err(|e| CloudError::transport(format!("entries:write failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(entries = request.entries.len(), "wrote log entries");
            return Ok(());
        }

        let body = response.text().unwrap_or_default();
        Err(CloudError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
