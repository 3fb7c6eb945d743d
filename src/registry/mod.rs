//! Named channel configurations, owned by the application and passed to every
//! channel it creates.
//!
//! Precedence when a channel is resolved, lowest first: the builtin default,
//! the stored `default` entry, the stored channel entry, the per-call override.
//! The merged result is stored back, so an override given once sticks to the
//! channel for later lookups.

use crate::Error;
use crate::channel::Channel;
use crate::cleanup::{self, FlushResult};
use crate::config::{
    self, ChannelConfig, ChannelOptions, ConfigSource, DEFAULT_CHANNEL, default_config_path,
};
use crate::fmt::RequestContext;
use crate::internal;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

/// A channel name together with its fully merged configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub name: String,
    pub config: ChannelConfig,
}

#[derive(Debug)]
struct Inner {
    /// Hardcoded defaults, adjustable through `set_default`.
    builtin: ChannelConfig,
    entries: BTreeMap<String, ChannelOptions>,
}

impl Inner {
    fn builtin_options(&self) -> ChannelOptions {
        ChannelOptions::from(self.builtin.clone())
    }

    /// Layers freshly loaded entries: `default` over the builtin, every other
    /// entry over the new `default`.
    fn initialize(&self, mut entries: BTreeMap<String, ChannelOptions>) -> BTreeMap<String, ChannelOptions> {
        let loaded_default = entries.remove(DEFAULT_CHANNEL).unwrap_or_default();
        let default = self.builtin_options().overlay(&loaded_default);

        let mut layered: BTreeMap<String, ChannelOptions> = entries
            .into_iter()
            .map(|(name, options)| (name, default.overlay(&options)))
            .collect();
        layered.insert(DEFAULT_CHANNEL.to_string(), default);
        layered
    }

    fn default_entry(&mut self) -> ChannelOptions {
        let builtin = self.builtin_options();
        self.entries
            .entry(DEFAULT_CHANNEL.to_string())
            .or_insert(builtin)
            .clone()
    }
}

/// Mutex-guarded store of channel configurations. Share it with `Arc` when
/// several threads create channels.
#[derive(Debug)]
pub struct Registry {
    inner: Mutex<Inner>,
    request: Arc<RequestContext>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Empty registry; the server map for `{SERVER.*}` is the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                builtin: ChannelConfig::default(),
                entries: BTreeMap::new(),
            }),
            request: Arc::new(RequestContext::from_env()),
        }
    }

    /// Replaces the request metadata handed to channels created from now on.
    #[must_use]
    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = Arc::new(request);
        self
    }

    #[must_use]
    pub fn request(&self) -> Arc<RequestContext> {
        Arc::clone(&self.request)
    }

    /// Replaces every entry with the contents of `source`.
    ///
    /// # Errors
    /// `Error::Config` (or `ConfigParse`/`CyclicInclude`) when the source is
    /// missing, empty, not a mapping, or yields an invalid channel. The
    /// registry is left untouched on error.
    pub fn load_configs(&self, source: impl Into<ConfigSource>) -> Result<(), Error> {
        let entries = config::load_source(source.into())?;

        let mut inner = self.inner.lock();
        let layered = inner.initialize(entries);
        for (name, options) in &layered {
            config::validate(name, &inner.builtin.with(options))?;
        }
        inner.entries = layered;

        internal::debug(
            "REGISTRY",
            &format!("Loaded {} channel configs", inner.entries.len()),
        );
        Ok(())
    }

    /// Loads `<config dir>/chanlog/chanlog.toml` when it exists.
    /// Returns whether a file was loaded.
    ///
    /// # Errors
    /// Same as [`Registry::load_configs`]; a missing file is not an error.
    pub fn load_default_file(&self) -> Result<bool, Error> {
        let path: PathBuf = default_config_path()?;
        if !path.exists() {
            internal::debug("REGISTRY", "No config file at the default location");
            return Ok(false);
        }
        self.load_configs(path)?;
        Ok(true)
    }

    /// Stores `base ⊕ options` under `name`, `base` defaulting to the builtin default.
    pub fn set_channel_config(
        &self,
        name: &str,
        options: &ChannelOptions,
        base: Option<&ChannelOptions>,
    ) {
        let mut inner = self.inner.lock();
        let base = base.cloned().unwrap_or_else(|| inner.builtin_options());
        inner.entries.insert(name.to_string(), base.overlay(options));
    }

    /// Merges `options` into the builtin default and into the stored `default`
    /// entry, returning the resulting default configuration. Only channels not
    /// yet stored pick up the change: a loaded or resolved channel keeps the
    /// full configuration it was stored with.
    pub fn set_default(&self, options: &ChannelOptions) -> ChannelConfig {
        let mut inner = self.inner.lock();
        inner.builtin = inner.builtin.with(options);

        let entry = match inner.entries.get(DEFAULT_CHANNEL) {
            Some(existing) => existing.overlay(options),
            None => inner.builtin_options(),
        };
        let config = inner.builtin.with(&entry);
        inner.entries.insert(DEFAULT_CHANNEL.to_string(), entry);
        config
    }

    /// Drops every stored entry. The builtin default is kept.
    pub fn reset(&self) {
        self.inner.lock().entries.clear();
    }

    /// Merges default, stored entry and `overrides` for `name` (blank means
    /// `default`), stores the merge back and returns it.
    ///
    /// # Errors
    /// `Error::Config` when the merged configuration is invalid; nothing is
    /// stored in that case.
    pub fn resolve(&self, name: &str, overrides: &ChannelOptions) -> Result<Resolved, Error> {
        let name = match name.trim() {
            "" => DEFAULT_CHANNEL,
            trimmed => trimmed,
        };

        let mut inner = self.inner.lock();
        let default = inner.default_entry();
        let stored = inner.entries.get(name).cloned().unwrap_or_else(|| {
            internal::debug("REGISTRY", &format!("Seeding channel '{name}' from default"));
            default.clone()
        });

        let merged = default.overlay(&stored).overlay(overrides);
        let config = inner.builtin.with(&merged);
        config::validate(name, &config)?;
        inner.entries.insert(name.to_string(), merged);

        Ok(Resolved {
            name: name.to_string(),
            config,
        })
    }

    /// Channel bound to the resolved configuration of `name`.
    ///
    /// # Errors
    /// Same as [`Registry::resolve`].
    pub fn channel(&self, name: &str) -> Result<Channel, Error> {
        Channel::new(self, name, &ChannelOptions::new())
    }

    /// Channel for `name` with per-call overrides on top.
    ///
    /// # Errors
    /// Same as [`Registry::resolve`].
    pub fn channel_with(&self, name: &str, overrides: &ChannelOptions) -> Result<Channel, Error> {
        Channel::new(self, name, overrides)
    }

    /// Names of every stored entry, sorted.
    #[must_use]
    pub fn channel_names(&self) -> Vec<String> {
        self.inner.lock().entries.keys().cloned().collect()
    }

    /// The `default` entry as it would resolve now, without storing anything.
    #[must_use]
    pub fn default_config(&self) -> ChannelConfig {
        let inner = self.inner.lock();
        inner.entries.get(DEFAULT_CHANNEL).map_or_else(
            || inner.builtin.clone(),
            |entry| inner.builtin.with(entry),
        )
    }

    /// Flushes the folder of every stored channel. All folders are checked
    /// against the protected list before the first deletion, so a reserved
    /// folder aborts the whole call with nothing removed.
    ///
    /// # Errors
    /// `Error::ProtectedPath` or `Error::Filesystem`.
    pub fn flush_all(&self) -> Result<FlushResult, Error> {
        let folders: BTreeSet<PathBuf> = {
            let inner = self.inner.lock();
            inner
                .entries
                .values()
                .map(|options| {
                    let folder = inner.builtin.with(options).folder;
                    PathBuf::from(shellexpand::tilde(&folder).as_ref())
                })
                .collect()
        };

        if let Some(protected) = folders.iter().find(|f| cleanup::is_protected(f)) {
            return Err(Error::ProtectedPath(protected.clone()));
        }

        let mut total = FlushResult::default();
        for folder in &folders {
            total.absorb(cleanup::flush(folder)?);
        }
        Ok(total)
    }
}
