//! A CSV channel configured from a table: header once, quoted date, caller columns.

use chanlog::fmt::EOL;
use chanlog::{ChannelOptions, Registry};
use std::fs;
use tempfile::TempDir;

const HEADER: &str = r#""date";"message";"class";"function""#;

fn csv_registry(tmp_dir: &TempDir) -> Registry {
    let folder = tmp_dir.path().to_string_lossy().into_owned();
    let source = format!(
        r#"
[default]
folder = '{folder}'

[csv]
header = '{HEADER}'
pattern_file = "/{{TYPE}}-{{YEAR}}{{MONTH}}{{DAY}}"
pattern_row = '"{{DATE}}";{{MESSAGE}};"{{BACKTRACE.CLASS}}";"{{BACKTRACE.FUNCTION}}"'
extension = "csv"
"#
    );
    let table: toml::Table = source.parse().unwrap();

    let registry = Registry::new();
    registry.load_configs(table).unwrap();
    registry
}

#[test]
fn csv_rows_follow_the_header() {
    let tmp_dir = TempDir::new().unwrap();
    let registry = csv_registry(&tmp_dir);

    let mut log = registry
        .channel("csv")
        .unwrap()
        .with_caller(chanlog::caller!());
    log.info("CSV message").unwrap();
    log.info("second row").unwrap();

    let path = log.path().unwrap().to_path_buf();
    assert!(path.starts_with(tmp_dir.path()));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER);

    let offset = content.find(";CSV message;").unwrap();
    assert_eq!(offset, HEADER.len() + EOL.len() + 21);
    assert!(lines[1].ends_with(r#";"csv_channel";"csv_rows_follow_the_header""#));
    assert!(lines[2].contains(";second row;"));
}

#[test]
fn other_channels_keep_the_default_layout() {
    let tmp_dir = TempDir::new().unwrap();
    let registry = csv_registry(&tmp_dir);

    let mut log = registry.channel("simple").unwrap();
    log.notice("plain").unwrap();

    let path = log.path().unwrap().to_path_buf();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("log"));
    let content = fs::read_to_string(path).unwrap();
    assert!(content.starts_with(|c: char| c.is_ascii_digit()));
    assert!(content.contains(" | NOTICE --- plain"));
}

#[test]
fn override_changes_only_this_channel() {
    let tmp_dir = TempDir::new().unwrap();
    let registry = csv_registry(&tmp_dir);

    let mut log = registry
        .channel_with("csv", &ChannelOptions::new().extension("txt"))
        .unwrap();
    log.info("overridden").unwrap();

    let path = log.path().unwrap().to_path_buf();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("txt"));
    assert!(fs::read_to_string(path).unwrap().starts_with(HEADER));
}

#[test]
fn missing_caller_keeps_backtrace_literal() {
    let tmp_dir = TempDir::new().unwrap();
    let registry = csv_registry(&tmp_dir);

    let mut log = registry.channel("csv").unwrap();
    log.info("anonymous").unwrap();

    let content = fs::read_to_string(log.path().unwrap()).unwrap();
    assert!(content.contains(r#";"{BACKTRACE.CLASS}";"{BACKTRACE.FUNCTION}""#));
}
