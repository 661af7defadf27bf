//! Cloud Logging v2 `entries:write` body.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use logfacade_core::{Entry, Severity};

use crate::config::CloudConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRequest {
    pub entries: Vec<WireEntry>,
    pub partial_success: bool,
}

impl WriteRequest {
    pub fn new(entries: Vec<WireEntry>) -> Self {
        Self {
            entries,
            partial_success: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireSeverity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl From<Severity> for WireSeverity {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Debug => WireSeverity::Debug,
            Severity::Info => WireSeverity::Info,
            Severity::Warn => WireSeverity::Warning,
            Severity::Error => WireSeverity::Error,
            Severity::Critical => WireSeverity::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitoredResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub message: String,
    pub caller: String,
    pub trace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEntry {
    pub log_name: String,
    pub resource: MonitoredResource,
    pub timestamp: DateTime<Utc>,
    pub severity: WireSeverity,
    /// Omitted when the entry has no trace id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
    pub json_payload: Payload,
}

impl WireEntry {
    pub fn from_entry(
        config: &CloudConfig,
        severity: Severity,
        timestamp: DateTime<Utc>,
        entry: &Entry<'_>,
    ) -> Self {
        let trace = (!entry.trace_id().is_empty()).then(|| config.trace_path(entry.trace_id()));
        Self {
            log_name: config.log_path(),
            resource: config.resource(),
            timestamp,
            severity: severity.into(),
            trace,
            json_payload: Payload {
                message: entry.message(),
                caller: entry.caller().to_string(),
                trace: entry.trace().to_string(),
            },
        }
    }
}
