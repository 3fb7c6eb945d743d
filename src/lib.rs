//! `chanlog` - channel-based file logging with templated paths and rows.
//!
//! Every channel (`default`, `payment`, `csv`, ...) resolves its own folder,
//! file pattern, row pattern and extension by layering its options over a
//! default configuration held in a [`Registry`]. Rows are appended to files
//! whose paths are rendered from placeholder templates such as
//! `/{TYPE}/{YEAR}-{MONTH}/{TYPE}-{YEAR}-{MONTH}-{DAY}`.
//!
//! # Example
//!
//! ```no_run
//! use chanlog::{ChannelOptions, Registry};
//!
//! # fn main() -> Result<(), chanlog::Error> {
//! let registry = Registry::new();
//! registry.set_default(&ChannelOptions::new().folder("/var/log/app"));
//!
//! let mut log = registry.channel("payment")?;
//! log.info("Payment accepted")?;
//! log.warning(serde_json::json!({"order": 42, "retry": true}))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Templates
//!
//! `{YEAR} {MONTH} {DAY} {HOUR} {MIN} {DATE} {MESSAGE} {TITLE} {TYPE} {STATUS}
//! {REQUEST} {RAWBODY} {EOL}`, plus `{SERVER.<key>}` from the request's server
//! map and `{BACKTRACE.<key>}` (`class`, `function`, `file`, `line`) from the
//! [`Caller`] attached with [`caller!`]. Unresolved tokens are left as written.

pub mod channel;
pub mod cleanup;
pub mod config;
mod error;
pub mod fmt;
pub mod internal;
pub mod level;
pub mod registry;

pub use channel::{Channel, Message};
pub use cleanup::{FlushResult, flush, format_size, is_protected};
pub use config::{ChannelConfig, ChannelOptions, ConfigSource, deep_merge};
pub use error::{Error, ErrorKind};
pub use fmt::{Caller, RenderContext, RequestContext, render};
pub use level::Level;
pub use registry::{Registry, Resolved};
