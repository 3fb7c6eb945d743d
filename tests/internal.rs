//! The diagnostics channel is process-global, so this binary holds one test.

use chanlog::{Channel, ChannelConfig, ChannelOptions, internal};
use std::fs;
use tempfile::TempDir;

#[test]
fn diagnostics_are_written_through_the_installed_channel() {
    let diag_dir = TempDir::new().unwrap();
    let config = ChannelConfig::default().with(
        &ChannelOptions::new()
            .folder(diag_dir.path().to_string_lossy().to_string())
            .pattern_file("/internal")
            .pattern_row("{STATUS} {TITLE}: {MESSAGE}"),
    );
    let diag_path = diag_dir.path().join("internal.log");

    assert!(!internal::is_initialized());
    assert!(internal::init(Channel::from_config("chanlog", config.clone()), true));
    assert!(!internal::init(Channel::from_config("other", config), false));
    assert!(internal::is_initialized());

    let data_dir = TempDir::new().unwrap();
    let logs = data_dir.path().join("logs");
    fs::create_dir_all(logs.join("a")).unwrap();
    fs::write(logs.join("a/one.log"), "row\n").unwrap();
    chanlog::flush(&logs).unwrap();

    assert!(chanlog::flush(std::path::Path::new("..")).is_err());

    let content = fs::read_to_string(&diag_path).unwrap();
    assert!(content.contains("DEBUG INTERNAL: Diagnostics channel ready"));
    assert!(content.contains("INFO CLEANUP: Flushed"));
    assert!(content.contains("WARNING CLEANUP: Refusing to flush protected folder .."));
}
