//! Everything a template can reference besides its own text.

use crate::level::Level;
use chrono::{DateTime, Local};
use serde_json::Value;
use std::collections::BTreeMap;
use std::panic::Location;

/// Request-side metadata behind `{SERVER.*}`, `{REQUEST}` and `{RAWBODY}`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// Server environment, looked up with case-sensitive keys.
    pub server: BTreeMap<String, String>,
    /// Request parameters, pretty-printed for `{REQUEST}`.
    pub params: Value,
    /// Raw request body for `{RAWBODY}`.
    pub raw_body: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            server: BTreeMap::new(),
            params: Value::Object(serde_json::Map::new()),
            raw_body: String::new(),
        }
    }
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the process environment as the server map.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            server: std::env::vars().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn server(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.server.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.raw_body = body.into();
        self
    }
}

/// Identity of the code that emitted a row, behind `{BACKTRACE.*}`.
///
/// Build one with [`caller!`](crate::caller) at the call site. File and line
/// are also filled automatically by the channel's emit methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub class: Option<String>,
    pub function: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Caller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a type path such as `app::billing::Invoice::send` into the
    /// enclosing path (`class`) and the last segment (`function`). Closure
    /// segments are skipped so the enclosing named function is reported.
    #[must_use]
    pub fn from_type_path(path: &str) -> Self {
        let mut path = path.strip_suffix("::__chanlog_here").unwrap_or(path);
        while let Some(stripped) = path.strip_suffix("::{{closure}}") {
            path = stripped;
        }

        let (class, function) = match path.rsplit_once("::") {
            Some((class, function)) => (Some(class.to_string()), function.to_string()),
            None => (None, path.to_string()),
        };

        Self {
            class,
            function: Some(function),
            file: None,
            line: None,
        }
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    #[must_use]
    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    #[must_use]
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub const fn line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Fills file and line from `location` where they are not already known.
    #[must_use]
    pub fn located(mut self, location: &Location<'_>) -> Self {
        if self.file.is_none() {
            self.file = Some(location.file().to_string());
        }
        if self.line.is_none() {
            self.line = Some(location.line());
        }
        self
    }

    /// Lower-case key lookup; unknown keys and missing values yield `None`.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        match key {
            "class" => self.class.clone(),
            "function" => self.function.clone(),
            "file" => self.file.clone(),
            "line" => self.line.map(|l| l.to_string()),
            _ => None,
        }
    }
}

/// Captures the enclosing function, its path, file and line as a [`Caller`].
///
/// ```
/// fn send_invoice() -> chanlog::Caller {
///     chanlog::caller!()
/// }
///
/// assert_eq!(send_invoice().function.as_deref(), Some("send_invoice"));
/// ```
#[macro_export]
macro_rules! caller {
    () => {{
        fn __chanlog_here() {}
        fn __chanlog_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::Caller::from_type_path(__chanlog_name_of(__chanlog_here))
            .file(::std::file!())
            .line(::std::line!())
    }};
}

/// Values for a single render.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub now: DateTime<Local>,
    pub message: &'a str,
    pub title: &'a str,
    pub channel: &'a str,
    pub status: Level,
    pub format_date: &'a str,
    pub request: &'a RequestContext,
    pub caller: Option<&'a Caller>,
}

impl<'a> RenderContext<'a> {
    /// Empty message and title, INFO status, default date format.
    #[must_use]
    pub const fn new(now: DateTime<Local>, channel: &'a str, request: &'a RequestContext) -> Self {
        Self {
            now,
            message: "",
            title: "",
            channel,
            status: Level::Info,
            format_date: "%Y-%m-%d %H:%M:%S",
            request,
            caller: None,
        }
    }

    #[must_use]
    pub const fn message(mut self, message: &'a str) -> Self {
        self.message = message;
        self
    }

    #[must_use]
    pub const fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub const fn status(mut self, status: Level) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn format_date(mut self, format: &'a str) -> Self {
        self.format_date = format;
        self
    }

    #[must_use]
    pub const fn caller(mut self, caller: Option<&'a Caller>) -> Self {
        self.caller = caller;
        self
    }
}
