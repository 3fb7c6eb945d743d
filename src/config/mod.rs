//! Configuration sources, TOML loading with `source = "..."` include resolution,
//! and the typed channel configuration.
//!
//! A source is a mapping from channel name to channel options. Files are TOML
//! with one table per channel:
//!
//! ```toml
//! source = "~/.config/chanlog/shared.toml"
//!
//! [default]
//! folder = "/var/log/app"
//!
//! [csv]
//! header = '"date";"message"'
//! pattern_row = '"{DATE}";{MESSAGE}'
//! extension = "csv"
//! ```

mod merge;
mod structs;

pub use merge::{deep_merge, deep_merged};
pub use structs::{ChannelConfig, ChannelOptions, DEFAULT_FOLDER_CHMOD};

use crate::Error;
use crate::fmt;
use crate::internal;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Name of the entry every other channel is layered on.
pub const DEFAULT_CHANNEL: &str = "default";

/// Where a registry's channel entries come from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// TOML file, includes resolved.
    File(PathBuf),
    /// Raw nested mapping, one table per channel.
    Table(Table),
    /// Already typed entries.
    Channels(BTreeMap<String, ChannelOptions>),
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<Table> for ConfigSource {
    fn from(table: Table) -> Self {
        Self::Table(table)
    }
}

impl From<BTreeMap<String, ChannelOptions>> for ConfigSource {
    fn from(channels: BTreeMap<String, ChannelOptions>) -> Self {
        Self::Channels(channels)
    }
}

/// Turns a source into validated channel entries.
///
/// # Errors
/// `Error::Config` when the source is empty, the file is missing, or an entry
/// is not a mapping; `Error::ConfigParse` on TOML syntax errors;
/// `Error::CyclicInclude` when includes loop.
pub fn load_source(source: ConfigSource) -> Result<BTreeMap<String, ChannelOptions>, Error> {
    match source {
        ConfigSource::File(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            let table = load_table(&path, &mut HashSet::new())?;
            internal::info("CONFIG", &format!("Config loaded from {}", path.display()));
            channels_from_table(table)
        }
        ConfigSource::Table(table) => channels_from_table(table),
        ConfigSource::Channels(channels) => {
            if channels.is_empty() {
                return Err(Error::Config("config source is empty".to_string()));
            }
            Ok(channels)
        }
    }
}

fn channels_from_table(table: Table) -> Result<BTreeMap<String, ChannelOptions>, Error> {
    if table.is_empty() {
        return Err(Error::Config("config source is empty".to_string()));
    }

    let mut channels = BTreeMap::new();
    for (name, value) in table {
        let options = match value {
            Value::Table(section) => Value::Table(section).try_into::<ChannelOptions>()?,
            other => {
                return Err(Error::Config(format!(
                    "entry '{name}' is not a mapping (found {})",
                    other.type_str()
                )));
            }
        };
        channels.insert(name, options);
    }
    Ok(channels)
}

/// Reads one file, folding its includes underneath it. `stack` holds the files
/// currently being expanded so a loop is reported instead of recursing forever.
fn load_table(path: &Path, stack: &mut HashSet<PathBuf>) -> Result<Table, Error> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    if !stack.insert(canonical.clone()) {
        internal::warn(
            "CONFIG",
            &format!("Cyclic include detected: {}", canonical.display()),
        );
        return Err(Error::CyclicInclude(canonical));
    }

    let content = fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))?;
    let (sources, toml_content) = extract_sources(&content);
    let mut table: Table = toml::from_str(&toml_content)?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    for source in sources {
        internal::debug("CONFIG", &format!("Processing source: {source}"));
        let expanded = shellexpand::tilde(&source);
        let source_path = base_dir.join(expanded.as_ref());
        if source_path.exists() {
            let mut included = load_table(&source_path, stack)?;
            deep_merge(&mut included, table);
            table = included;
        } else {
            internal::warn("CONFIG", &format!("Source file not found: {source}"));
        }
    }

    stack.remove(&canonical);
    Ok(table)
}

/// Pulls `source = "..."` lines out of raw TOML before parsing; serde has no
/// notion of includes. Returns the include paths and the remaining content.
#[doc(hidden)]
#[must_use]
pub fn extract_sources(content: &str) -> (Vec<String>, String) {
    let mut sources = Vec::new();
    let mut remaining = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("source") && trimmed.contains('=') {
            if let Some(path) = trimmed
                .split_once('=')
                .map(|(_, rhs)| rhs.trim().trim_matches('"').trim_matches('\''))
                && !path.is_empty()
            {
                sources.push(path.to_string());
            }
        } else {
            remaining.push_str(line);
            remaining.push('\n');
        }
    }

    (sources, remaining)
}

/// `<config dir>/chanlog/chanlog.toml`, following the platform convention.
///
/// # Errors
/// Fails when the platform has no concept of a config directory.
pub fn default_config_path() -> Result<PathBuf, Error> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("chanlog").join("chanlog.toml"))
        .ok_or_else(|| Error::Config("config directory not found".to_string()))
}

/// Rejects resolved values the renderer cannot honour.
///
/// # Errors
/// `Error::Config` when `format_date` is not a valid strftime string.
pub fn validate(name: &str, config: &ChannelConfig) -> Result<(), Error> {
    if !fmt::is_valid_date_format(&config.format_date) {
        return Err(Error::Config(format!(
            "channel '{name}': invalid format_date '{}'",
            config.format_date
        )));
    }
    Ok(())
}
