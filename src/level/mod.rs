//! Message levels. They are substitution values for `{STATUS}` only; nothing is filtered by level.

use std::fmt;
use std::str::FromStr;

/// Closed set of levels a channel can stamp on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    #[default]
    Info,
    Debug,
    Error,
    Notice,
    Warning,
    Critical,
    /// Rows produced by `Channel::exception`.
    Exception,
}

impl Level {
    /// Uppercase, exactly as written into templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Error => "ERROR",
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Exception => "EXCEPTION",
        }
    }

    /// Convenience for iteration in tests and diagnostics.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Info,
            Self::Debug,
            Self::Error,
            Self::Notice,
            Self::Warning,
            Self::Critical,
            Self::Exception,
        ]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `FromStr` so callers can distinguish "unknown level" from other parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "error" | "err" => Ok(Self::Error),
            "notice" => Ok(Self::Notice),
            "warning" | "warn" => Ok(Self::Warning),
            "critical" | "crit" => Ok(Self::Critical),
            "exception" => Ok(Self::Exception),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
