//! chanlog's own diagnostics (config loading, directory creation, flushes).
//!
//! Silent until [`init`] hands it a channel; from then on events are written
//! through that channel like any other row, with the scope as `{TITLE}`.
//! A diagnostic raised while another one is being written on the same thread
//! is dropped, so a diagnostics channel can never recurse into itself.

use crate::channel::Channel;
use crate::level::Level;
use parking_lot::Mutex;
use std::cell::Cell;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

static SINK: OnceLock<Mutex<Channel>> = OnceLock::new();
static VERBOSE: AtomicBool = AtomicBool::new(false);

thread_local! {
    static WRITING: Cell<bool> = const { Cell::new(false) };
}

/// Installs the diagnostics channel. Only the first call takes effect; the
/// return value tells whether this call was it. `verbose` enables debug events.
pub fn init(channel: Channel, verbose: bool) -> bool {
    let mut installed = false;
    SINK.get_or_init(|| {
        installed = true;
        Mutex::new(channel)
    });
    if installed {
        VERBOSE.store(verbose, Ordering::Relaxed);
        debug("INTERNAL", "Diagnostics channel ready");
    }
    installed
}

/// Whether a diagnostics channel has been installed.
#[must_use]
pub fn is_initialized() -> bool {
    SINK.get().is_some()
}

/// Write failures are swallowed: diagnostics must never fail the operation
/// they describe.
fn log(level: Level, scope: &str, msg: &str) {
    let Some(sink) = SINK.get() else {
        return;
    };
    if WRITING.with(Cell::get) {
        return;
    }

    WRITING.with(|w| w.set(true));
    let _ = sink.lock().emit(msg, level, Some(scope));
    WRITING.with(|w| w.set(false));
}

/// Step-by-step detail, written only when initialized as verbose.
pub fn debug(scope: &str, msg: &str) {
    if VERBOSE.load(Ordering::Relaxed) {
        log(Level::Debug, scope, msg);
    }
}

/// Normal milestones: config loaded, folder flushed.
pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Non-fatal anomalies: missing include, refused flush.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warning, scope, msg);
}

/// Failures that are also returned to the caller.
pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
