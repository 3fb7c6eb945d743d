//! Configuration struct definitions.

use serde::Deserialize;
use std::path::MAIN_SEPARATOR;

/// Permission bits used when a channel does not configure any (or configures zero).
pub const DEFAULT_FOLDER_CHMOD: u32 = 0o770;

/// Fully resolved channel configuration. Every field is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Base directory, prepended verbatim to the rendered file pattern.
    pub folder: String,
    /// Permission bits for directories created on demand.
    pub folder_chmod: u32,
    /// Path template without extension, e.g. `/{TYPE}/{YEAR}-{MONTH}/{TYPE}-{DAY}`.
    pub pattern_file: String,
    /// Row template.
    pub pattern_row: String,
    /// File suffix. Empty means the rendered pattern is used as-is.
    pub extension: String,
    /// strftime format behind `{DATE}`.
    pub format_date: String,
    /// Written once, as the first line of a newly created file.
    pub header: Option<String>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            folder: format!(".{MAIN_SEPARATOR}logs"),
            folder_chmod: DEFAULT_FOLDER_CHMOD,
            pattern_file: format!(
                "{MAIN_SEPARATOR}{{TYPE}}{MAIN_SEPARATOR}{{YEAR}}-{{MONTH}}{MAIN_SEPARATOR}{{TYPE}}-{{YEAR}}-{{MONTH}}-{{DAY}}"
            ),
            pattern_row: "{DATE} | {STATUS} --- {MESSAGE}".to_string(),
            extension: "log".to_string(),
            format_date: "%Y-%m-%d %H:%M:%S".to_string(),
            header: None,
        }
    }
}

impl ChannelConfig {
    /// Copy of `self` with every field present in `options` written over it.
    #[must_use]
    pub fn with(&self, options: &ChannelOptions) -> Self {
        let mut config = self.clone();
        options.apply_to(&mut config);
        config
    }
}

/// Partial configuration: what a config file section, a `set_default` call or
/// a per-call override actually specifies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelOptions {
    pub folder: Option<String>,
    pub folder_chmod: Option<u32>,
    pub pattern_file: Option<String>,
    pub pattern_row: Option<String>,
    pub extension: Option<String>,
    pub format_date: Option<String>,
    pub header: Option<String>,
}

impl ChannelOptions {
    /// Nothing set; overlaying it changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    #[must_use]
    pub const fn folder_chmod(mut self, mode: u32) -> Self {
        self.folder_chmod = Some(mode);
        self
    }

    #[must_use]
    pub fn pattern_file(mut self, pattern: impl Into<String>) -> Self {
        self.pattern_file = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn pattern_row(mut self, pattern: impl Into<String>) -> Self {
        self.pattern_row = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    #[must_use]
    pub fn format_date(mut self, format: impl Into<String>) -> Self {
        self.format_date = Some(format.into());
        self
    }

    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Right-biased per field: values present in `other` win.
    #[must_use]
    pub fn overlay(&self, other: &Self) -> Self {
        Self {
            folder: other.folder.clone().or_else(|| self.folder.clone()),
            folder_chmod: other.folder_chmod.or(self.folder_chmod),
            pattern_file: other
                .pattern_file
                .clone()
                .or_else(|| self.pattern_file.clone()),
            pattern_row: other
                .pattern_row
                .clone()
                .or_else(|| self.pattern_row.clone()),
            extension: other.extension.clone().or_else(|| self.extension.clone()),
            format_date: other
                .format_date
                .clone()
                .or_else(|| self.format_date.clone()),
            header: other.header.clone().or_else(|| self.header.clone()),
        }
    }

    /// Writes every present field into `config`.
    pub fn apply_to(&self, config: &mut ChannelConfig) {
        if let Some(ref folder) = self.folder {
            config.folder.clone_from(folder);
        }
        if let Some(mode) = self.folder_chmod {
            config.folder_chmod = mode;
        }
        if let Some(ref pattern) = self.pattern_file {
            config.pattern_file.clone_from(pattern);
        }
        if let Some(ref pattern) = self.pattern_row {
            config.pattern_row.clone_from(pattern);
        }
        if let Some(ref extension) = self.extension {
            config.extension.clone_from(extension);
        }
        if let Some(ref format) = self.format_date {
            config.format_date.clone_from(format);
        }
        if let Some(ref header) = self.header {
            config.header = Some(header.clone());
        }
    }
}

impl From<ChannelConfig> for ChannelOptions {
    fn from(config: ChannelConfig) -> Self {
        Self {
            folder: Some(config.folder),
            folder_chmod: Some(config.folder_chmod),
            pattern_file: Some(config.pattern_file),
            pattern_row: Some(config.pattern_row),
            extension: Some(config.extension),
            format_date: Some(config.format_date),
            header: config.header,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_right_biased() {
        let base = ChannelOptions::new().folder("a").extension("log");
        let top = ChannelOptions::new().extension("csv").header("h");
        let merged = base.overlay(&top);
        assert_eq!(merged.folder.as_deref(), Some("a"));
        assert_eq!(merged.extension.as_deref(), Some("csv"));
        assert_eq!(merged.header.as_deref(), Some("h"));
    }

    #[test]
    fn round_trip_through_options_keeps_config() {
        let config = ChannelConfig::default();
        let options = ChannelOptions::from(config.clone());
        assert_eq!(ChannelConfig::default().with(&options), config);
    }

    #[test]
    fn default_row_pattern() {
        let config = ChannelConfig::default();
        assert_eq!(config.pattern_row, "{DATE} | {STATUS} --- {MESSAGE}");
        assert_eq!(config.folder_chmod, 0o770);
        assert!(config.header.is_none());
    }
}
