//! Request-scoped context and trace identifiers.

use std::any::{Any, TypeId};
use std::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

/// Correlation identifier linking log entries to one logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId(String);

impl TraceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier (32 lowercase hex characters).
    ///
    /// Uses UUIDv7 so identifiers sort roughly by creation time.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Parse the `X-Cloud-Trace-Context` header form `TRACE_ID/SPAN_ID;o=OPTIONS`.
    ///
    /// Only the trace part is kept; span and options are optional.
    pub fn from_cloud_trace_header(header: &str) -> Option<Self> {
        let trace = header.split(['/', ';']).next()?.trim();
        if trace.is_empty() {
            return None;
        }
        Some(Self(trace.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TraceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TraceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Request-scoped bag of typed values handed to every log call.
///
/// At most one value per type is stored. Values are shared, so cloning a
/// context is cheap and clones observe the same values.
#[derive(Clone, Default)]
pub struct Context {
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, replacing any previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Arc::new(value));
    }

    pub fn with_value<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn with_trace_id(self, trace_id: impl Into<TraceId>) -> Self {
        self.with_value(trace_id.into())
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.get::<TraceId>()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.values.len())
            .field("trace_id", &self.trace_id())
            .finish()
    }
}

/// Stock extractor: the [`TraceId`] stored in the context, or an empty string.
pub fn extract_trace_id(ctx: &Context) -> String {
    ctx.trace_id()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default()
}
