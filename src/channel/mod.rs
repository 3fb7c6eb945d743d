//! A channel is one named log destination bound to its resolved configuration.
//!
//! The target file is re-derived on every emit because the path template may
//! reference the date or the status of the row being written.

mod message;

pub use message::Message;

use crate::Error;
use crate::cleanup::{self, FlushResult};
use crate::config::{ChannelConfig, ChannelOptions, DEFAULT_FOLDER_CHMOD};
use crate::fmt::{Caller, EOL, RenderContext, RequestContext, render};
use crate::internal;
use crate::level::Level;
use crate::registry::{Registry, Resolved};
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Log handle for one channel. Rows are appended synchronously; every method
/// that touches the filesystem returns the failure to the caller.
#[derive(Debug, Clone)]
pub struct Channel {
    name: String,
    config: ChannelConfig,
    status: Level,
    /// `None` while stale: after construction, a status change or a flush.
    path: Option<PathBuf>,
    request: Arc<RequestContext>,
    caller: Option<Caller>,
}

impl Channel {
    /// Resolves `name` against `registry` (default, stored entry, then
    /// `overrides`) and binds the result.
    ///
    /// # Errors
    /// `Error::Config` when the resolved configuration is invalid.
    pub fn new(registry: &Registry, name: &str, overrides: &ChannelOptions) -> Result<Self, Error> {
        let Resolved { name, config } = registry.resolve(name, overrides)?;
        Ok(Self::from_config(name, config).with_shared_request(registry.request()))
    }

    /// Binds an already resolved configuration, bypassing any registry.
    #[must_use]
    pub fn from_config(name: impl Into<String>, config: ChannelConfig) -> Self {
        Self {
            name: name.into().trim().to_string(),
            config,
            status: Level::Info,
            path: None,
            request: Arc::new(RequestContext::default()),
            caller: None,
        }
    }

    /// Identity reported by `{BACKTRACE.*}` tokens.
    #[must_use]
    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Request metadata for `{SERVER.*}`, `{REQUEST}` and `{RAWBODY}`.
    #[must_use]
    pub fn with_request(self, request: RequestContext) -> Self {
        self.with_shared_request(Arc::new(request))
    }

    #[must_use]
    pub fn with_shared_request(mut self, request: Arc<RequestContext>) -> Self {
        self.request = request;
        self.path = None;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Level of the last emitted row (INFO before the first one).
    #[must_use]
    pub const fn status(&self) -> Level {
        self.status
    }

    /// Base folder with `~` expanded.
    #[must_use]
    pub fn folder(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.config.folder).as_ref())
    }

    /// Current target file, resolving it (and creating its directory) if stale.
    ///
    /// # Errors
    /// `Error::Filesystem` when the parent directory cannot be created.
    pub fn path(&mut self) -> Result<&Path, Error> {
        let path = match self.path.take() {
            Some(path) => path,
            None => {
                let caller = self.caller.clone();
                self.set_path(Local::now(), caller.as_ref())?
            }
        };
        Ok(self.path.insert(path).as_path())
    }

    /// Renders `folder + pattern_file (+ "." + extension)` and makes sure the
    /// parent directory exists. `caller` feeds `{BACKTRACE.*}` in the pattern.
    fn set_path(&mut self, now: DateTime<Local>, caller: Option<&Caller>) -> Result<PathBuf, Error> {
        let rendered = render(&self.config.pattern_file, &self.context(now, caller));

        let mut path = format!("{}{rendered}", shellexpand::tilde(&self.config.folder));
        if !self.config.extension.is_empty() {
            path.push('.');
            path.push_str(&self.config.extension);
        }
        let path = PathBuf::from(path);

        ensure_parent(&path, self.config.folder_chmod)?;
        self.path = Some(path.clone());
        Ok(path)
    }

    fn context<'a>(&'a self, now: DateTime<Local>, caller: Option<&'a Caller>) -> RenderContext<'a> {
        RenderContext::new(now, &self.name, &self.request)
            .status(self.status)
            .format_date(&self.config.format_date)
            .caller(caller)
    }

    /// Writes one row at `level`, preceded by the header when the file is new.
    ///
    /// # Errors
    /// `Error::Format` when a structured message cannot be serialized;
    /// `Error::Filesystem` when the directory or the file cannot be written.
    #[track_caller]
    pub fn emit(
        &mut self,
        message: impl Into<Message>,
        level: Level,
        title: Option<&str>,
    ) -> Result<(), Error> {
        let location = Location::caller();
        let message = message.into().into_text()?;

        self.status = level;
        self.path = None;
        let now = Local::now();
        let caller = self.caller.clone().unwrap_or_default().located(location);
        let path = self.set_path(now, Some(&caller))?;
        let row = render(
            &self.config.pattern_row,
            &self
                .context(now, Some(&caller))
                .message(&message)
                .title(title.unwrap_or("")),
        );

        let mut content = String::new();
        if !path.exists()
            && let Some(header) = self.config.header.as_deref().filter(|h| !h.is_empty())
        {
            content.push_str(header);
            content.push_str(EOL);
        }
        content.push_str(&row);
        content.push_str(EOL);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::filesystem(&path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| Error::filesystem(&path, e))?;

        Ok(())
    }

    #[track_caller]
    pub fn info(&mut self, message: impl Into<Message>) -> Result<(), Error> {
        self.emit(message, Level::Info, None)
    }

    #[track_caller]
    pub fn debug(&mut self, message: impl Into<Message>) -> Result<(), Error> {
        self.emit(message, Level::Debug, None)
    }

    #[track_caller]
    pub fn error(&mut self, message: impl Into<Message>) -> Result<(), Error> {
        self.emit(message, Level::Error, None)
    }

    #[track_caller]
    pub fn warning(&mut self, message: impl Into<Message>) -> Result<(), Error> {
        self.emit(message, Level::Warning, None)
    }

    #[track_caller]
    pub fn notice(&mut self, message: impl Into<Message>) -> Result<(), Error> {
        self.emit(message, Level::Notice, None)
    }

    #[track_caller]
    pub fn critical(&mut self, message: impl Into<Message>) -> Result<(), Error> {
        self.emit(message, Level::Critical, None)
    }

    #[track_caller]
    pub fn info_titled(&mut self, message: impl Into<Message>, title: &str) -> Result<(), Error> {
        self.emit(message, Level::Info, Some(title))
    }

    #[track_caller]
    pub fn debug_titled(&mut self, message: impl Into<Message>, title: &str) -> Result<(), Error> {
        self.emit(message, Level::Debug, Some(title))
    }

    #[track_caller]
    pub fn error_titled(&mut self, message: impl Into<Message>, title: &str) -> Result<(), Error> {
        self.emit(message, Level::Error, Some(title))
    }

    #[track_caller]
    pub fn warning_titled(
        &mut self,
        message: impl Into<Message>,
        title: &str,
    ) -> Result<(), Error> {
        self.emit(message, Level::Warning, Some(title))
    }

    #[track_caller]
    pub fn notice_titled(
        &mut self,
        message: impl Into<Message>,
        title: &str,
    ) -> Result<(), Error> {
        self.emit(message, Level::Notice, Some(title))
    }

    #[track_caller]
    pub fn critical_titled(
        &mut self,
        message: impl Into<Message>,
        title: &str,
    ) -> Result<(), Error> {
        self.emit(message, Level::Critical, Some(title))
    }

    /// Logs `[error text, file, line]` at EXCEPTION, where file and line are
    /// the location of this call.
    ///
    /// # Errors
    /// Same as [`Channel::emit`].
    #[track_caller]
    pub fn exception(
        &mut self,
        err: &dyn std::error::Error,
        title: Option<&str>,
    ) -> Result<(), Error> {
        let location = Location::caller();
        let payload = serde_json::json!([err.to_string(), location.file(), location.line()]);
        self.emit(payload, Level::Exception, title)
    }

    /// Deletes this channel's whole folder tree.
    ///
    /// # Errors
    /// `Error::ProtectedPath` for reserved folders, `Error::Filesystem` when
    /// removal fails part-way.
    pub fn flush(&mut self) -> Result<FlushResult, Error> {
        self.path = None;
        cleanup::flush(&self.folder())
    }
}

fn ensure_parent(path: &Path, mode: u32) -> Result<(), Error> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    let mode = if mode == 0 { DEFAULT_FOLDER_CHMOD } else { mode };
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    match builder.create(parent) {
        Ok(()) => {
            internal::debug("CHANNEL", &format!("Created directory: {}", parent.display()));
            Ok(())
        }
        Err(e) => {
            internal::error(
                "CHANNEL",
                &format!("Failed to create directory {}: {e}", parent.display()),
            );
            Err(Error::filesystem(parent, e))
        }
    }
}
