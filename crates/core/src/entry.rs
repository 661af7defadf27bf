//! Log entries and call-site attribution.

use std::fmt;
use std::backtrace::Backtrace;
use std::panic::Location;

/// Upper bound, in bytes, of the stack snapshot stored in an [`Entry`].
pub const MAX_TRACE_BYTES: usize = 2048;

/// Marker item the [`call_site!`](crate::call_site) macro names to learn the
/// enclosing function path.
#[doc(hidden)]
pub const CALL_SITE_MARKER: &str = "__logfacade_call_site";

/// Source location a log call was issued from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    file: &'static str,
    line: u32,
    function: &'static str,
}

impl CallSite {
    /// `function` is a full item path as produced by `core::any::type_name`;
    /// pass `""` when it is unknown.
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// Location of whoever called the `#[track_caller]` chain this is used in.
    ///
    /// No function name is available this way.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), "")
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Enclosing function reduced to `module::function`, closures stripped.
    pub fn function(&self) -> String {
        let segments: Vec<&str> = self
            .function
            .split("::")
            .filter(|s| !s.is_empty() && *s != "{{closure}}" && *s != CALL_SITE_MARKER)
            .collect();
        let start = segments.len().saturating_sub(2);
        segments[start..].join("::")
    }

    /// `file#function:Lline`, or `file:Lline` when the function is unknown.
    pub fn label(&self) -> String {
        let function = self.function();
        if function.is_empty() {
            format!("{}:L{}", self.file, self.line)
        } else {
            format!("{}#{}:L{}", self.file, function, self.line)
        }
    }
}

/// Capture the [`CallSite`] of the macro invocation, including the enclosing
/// function's path.
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __logfacade_call_site() {}
        fn __logfacade_type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        $crate::CallSite::new(
            ::core::file!(),
            ::core::line!(),
            __logfacade_type_name_of(__logfacade_call_site),
        )
    }};
}

/// One log event.
///
/// Built once by the [`Logger`](crate::Logger) and never mutated. The
/// arguments borrow the caller's values, so an entry only lives for the
/// duration of one dispatch; sinks copy out whatever they keep.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    format: &'static str,
    args: fmt::Arguments<'a>,
    caller: String,
    trace: String,
    trace_id: String,
}

impl<'a> Entry<'a> {
    /// Build an entry carrying a bounded snapshot of the current stack.
    pub fn capture(
        trace_id: impl Into<String>,
        site: CallSite,
        format: &'static str,
        args: fmt::Arguments<'a>,
    ) -> Self {
        Self {
            format,
            args,
            caller: site.label(),
            trace: capture_stack(),
            trace_id: trace_id.into(),
        }
    }

    /// Build an entry without a stack snapshot, for hot paths.
    pub fn without_trace(
        trace_id: impl Into<String>,
        site: CallSite,
        format: &'static str,
        args: fmt::Arguments<'a>,
    ) -> Self {
        Self {
            format,
            args,
            caller: site.label(),
            trace: String::new(),
            trace_id: trace_id.into(),
        }
    }

    /// The format template the message was written with.
    pub fn format(&self) -> &'static str {
        self.format
    }

    pub fn args(&self) -> fmt::Arguments<'a> {
        self.args
    }

    /// Render the message. Computed on every call.
    pub fn message(&self) -> String {
        fmt::format(self.args)
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    /// Stack snapshot; empty for entries built with [`Entry::without_trace`].
    pub fn trace(&self) -> &str {
        &self.trace
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }
}

impl fmt::Display for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(self.args)
    }
}

fn capture_stack() -> String {
    let mut text = Backtrace::force_capture().to_string();
    if text.is_empty() {
        text.push_str("<stack unavailable>");
    }
    truncate_on_char_boundary(&mut text, MAX_TRACE_BYTES);
    text
}

pub(crate) fn truncate_on_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}
