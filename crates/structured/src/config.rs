//! Structured sink configuration.

use std::sync::Arc;

use logfacade_core::Severity;

use crate::formatter::{Formatter, TextFormatter};

/// How a [`StructuredSink`](crate::StructuredSink) renders and filters.
///
/// Built once and passed by value into the sink's constructor.
#[derive(Debug, Clone)]
pub struct StructuredConfig {
    /// Output format. Defaults to [`TextFormatter`].
    pub formatter: Arc<dyn Formatter>,
    /// Entries below this severity are dropped. Defaults to `Debug`.
    pub level: Severity,
}

impl StructuredConfig {
    pub fn with_formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }
}

impl Default for StructuredConfig {
    fn default() -> Self {
        Self {
            formatter: Arc::new(TextFormatter::default()),
            level: Severity::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::JsonFormatter;

    #[test]
    fn defaults_to_text_at_debug() {
        let config = StructuredConfig::default();
        assert_eq!(config.level, Severity::Debug);
        assert!(format!("{:?}", config.formatter).starts_with("TextFormatter"));
    }

    #[test]
    fn builder_overrides() {
        let config = StructuredConfig::default()
            .with_formatter(JsonFormatter { pretty: true })
            .with_level(Severity::Warn);
        assert_eq!(config.level, Severity::Warn);
        assert_eq!(format!("{:?}", config.formatter), "JsonFormatter { pretty: true }");
    }
}
