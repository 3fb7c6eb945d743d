//! Unified error type for all chanlog operations.

use std::fmt;
use std::path::PathBuf;

/// Coarse classification so callers can branch on the failure family
/// without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or missing configuration source, or an invalid resolved value.
    Config,
    /// A flush targeted a folder that must never be deleted.
    ProtectedPath,
    /// Directory creation, file append or recursive delete failed.
    Filesystem,
    /// A value could not be rendered.
    Format,
}

/// Error type for chanlog operations.
#[derive(Debug)]
pub enum Error {
    /// Configuration source is empty, missing, or not a mapping.
    Config(String),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Cyclic include detected in config sources.
    CyclicInclude(PathBuf),
    /// Deletion of a reserved folder was refused.
    ProtectedPath(PathBuf),
    /// I/O failure on a concrete path.
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Format/serialization error.
    Format(String),
}

impl Error {
    /// Attaches the offending path to an I/O error.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Family of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::ConfigParse(_) | Self::CyclicInclude(_) => ErrorKind::Config,
            Self::ProtectedPath(_) => ErrorKind::ProtectedPath,
            Self::Filesystem { .. } => ErrorKind::Filesystem,
            Self::Format(_) => ErrorKind::Format,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::CyclicInclude(p) => write!(f, "cyclic include: {}", p.display()),
            Self::ProtectedPath(p) => {
                write!(f, "protected folder cannot be removed: {}", p.display())
            }
            Self::Filesystem { path, source } => {
                write!(f, "I/O error on {}: {source}", path.display())
            }
            Self::Format(s) => write!(f, "format error: {s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigParse(e) => Some(e),
            Self::Filesystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e.to_string())
    }
}
