//! Record model and output formatters.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

use logfacade_core::{Entry, Severity};

/// Keys every record already carries; extra fields using them are renamed
/// to `fields.<key>`.
const RESERVED_KEYS: [&str; 3] = ["time", "level", "msg"];

/// One structured log line before formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub time: DateTime<Utc>,
    #[serde(serialize_with = "serialize_level")]
    pub level: Severity,
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl LogRecord {
    pub fn new(time: DateTime<Utc>, level: Severity, message: impl Into<String>) -> Self {
        Self {
            time,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Record for `entry`: the message is prefixed with the caller and
    /// followed by the stack snapshot, the trace id becomes a field.
    pub fn from_entry(time: DateTime<Utc>, level: Severity, entry: &Entry<'_>) -> Self {
        let mut message = format!("[{}]: {}", entry.caller(), entry);
        if !entry.trace().is_empty() {
            message.push('\n');
            message.push_str(entry.trace());
        }
        let record = Self::new(time, level, message);
        if entry.trace_id().is_empty() {
            record
        } else {
            record.with_field("trace_id", entry.trace_id())
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let key = if RESERVED_KEYS.contains(&key.as_str()) {
            format!("fields.{key}")
        } else {
            key
        };
        self.fields.insert(key, value.into());
        self
    }
}

/// Level names as leveled loggers spell them.
pub fn level_label(level: Severity) -> &'static str {
    match level {
        Severity::Debug => "debug",
        Severity::Info => "info",
        Severity::Warn => "warning",
        Severity::Error => "error",
        Severity::Critical => "critical",
    }
}

fn serialize_level<S: Serializer>(level: &Severity, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(level_label(*level))
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Turns a record into the bytes written for it, trailing newline included.
pub trait Formatter: Send + Sync + fmt::Debug {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>, FormatError>;
}

/// `key=value` text lines.
///
/// ```text
/// time="2026-10-18T09:30:12Z" level=info msg="[src/a.rs:L1]: ready" trace_id=abc
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    pub disable_timestamp: bool,
}

impl TextFormatter {
    pub fn without_timestamp() -> Self {
        Self {
            disable_timestamp: true,
        }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>, FormatError> {
        let mut pairs: Vec<String> = Vec::with_capacity(3 + record.fields.len());
        if !self.disable_timestamp {
            let time = record.time.to_rfc3339_opts(SecondsFormat::Secs, true);
            pairs.push(format!("time={}", quote(&time)));
        }
        pairs.push(format!("level={}", level_label(record.level)));
        pairs.push(format!("msg={}", quote(&record.message)));
        for (key, value) in &record.fields {
            pairs.push(format!("{}={}", key, quote(value)));
        }

        let mut line = pairs.join(" ");
        line.push('\n');
        Ok(line.into_bytes())
    }
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+'))
}

fn quote(value: &str) -> String {
    if needs_quoting(value) {
        format!("{value:?}")
    } else {
        value.to_string()
    }
}

/// One JSON object per line.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &LogRecord) -> Result<Vec<u8>, FormatError> {
        let mut bytes = if self.pretty {
            serde_json::to_vec_pretty(record)?
        } else {
            serde_json::to_vec(record)?
        };
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use logfacade_core::CallSite;

    fn time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 12).unwrap()
    }

    fn record() -> LogRecord {
        LogRecord::new(time(), Severity::Info, "[src/a.rs:L1]: ready").with_field("trace_id", "abc")
    }

    fn text(formatter: &TextFormatter, record: &LogRecord) -> String {
        String::from_utf8(formatter.format(record).unwrap()).unwrap()
    }

    #[test]
    fn text_formatter_renders_key_value_pairs() {
        assert_eq!(
            text(&TextFormatter::default(), &record()),
            "time=\"2026-10-18T09:30:12Z\" level=info msg=\"[src/a.rs:L1]: ready\" trace_id=abc\n"
        );
    }

    #[test]
    fn text_formatter_escapes_newlines_and_can_drop_time() {
        let record = LogRecord::new(time(), Severity::Warn, "line one\nline two");
        assert_eq!(
            text(&TextFormatter::without_timestamp(), &record),
            "level=warning msg=\"line one\\nline two\"\n"
        );
    }

    #[test]
    fn quoting_rules() {
        assert_eq!(quote("plain-value_1.2"), "plain-value_1.2");
        assert_eq!(quote(""), "\"\"");
        assert_eq!(quote("a=b"), "\"a=b\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn json_formatter_emits_one_object_per_line() {
        let bytes = JsonFormatter::default().format(&record()).unwrap();
        assert_eq!(bytes.last(), Some(&b'\n'));

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["level"], "info");
        assert_eq!(value["msg"], "[src/a.rs:L1]: ready");
        assert_eq!(value["trace_id"], "abc");
        assert_eq!(value["time"], "2026-10-18T09:30:12Z");
    }

    #[test]
    fn reserved_field_names_are_prefixed() {
        let record = LogRecord::new(time(), Severity::Error, "m").with_field("level", "user-supplied");
        assert_eq!(record.fields.get("fields.level").map(String::as_str), Some("user-supplied"));

        let value: serde_json::Value =
            serde_json::from_slice(&JsonFormatter::default().format(&record).unwrap()).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["fields.level"], "user-supplied");
    }

    #[test]
    fn record_from_entry_prefixes_caller_and_appends_trace() {
        let site = CallSite::new("src/jobs.rs", 12, "app::jobs::run");
        let untraced = Entry::without_trace("", site, "done", format_args!("done"));
        let record = LogRecord::from_entry(time(), Severity::Info, &untraced);
        assert_eq!(record.message, "[src/jobs.rs#jobs::run:L12]: done");
        assert!(record.fields.is_empty());

        let traced = Entry::capture("t-3", site, "done", format_args!("done"));
        let record = LogRecord::from_entry(time(), Severity::Info, &traced);
        assert!(record.message.starts_with("[src/jobs.rs#jobs::run:L12]: done\n"));
        assert_eq!(record.fields.get("trace_id").map(String::as_str), Some("t-3"));
    }
}
