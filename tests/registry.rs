//! Tests for configuration resolution.

use chanlog::{ChannelConfig, ChannelOptions, ErrorKind, Registry};
use std::collections::BTreeMap;

#[test]
fn empty_registry_resolves_builtin_default() {
    let registry = Registry::new();
    let resolved = registry.resolve("default", &ChannelOptions::new()).unwrap();
    assert_eq!(resolved.name, "default");
    assert_eq!(resolved.config, ChannelConfig::default());
    assert_eq!(registry.channel_names(), vec!["default".to_string()]);
}

#[test]
fn blank_name_means_default() {
    let registry = Registry::new();
    assert_eq!(
        registry.resolve("   ", &ChannelOptions::new()).unwrap().name,
        "default"
    );
}

#[test]
fn unknown_channel_is_seeded_from_default() {
    let registry = Registry::new();
    registry.set_default(&ChannelOptions::new().folder("/srv/logs"));

    let resolved = registry.resolve("audit", &ChannelOptions::new()).unwrap();

    assert_eq!(resolved.config.folder, "/srv/logs");
    assert!(registry.channel_names().contains(&"audit".to_string()));
}

#[test]
fn precedence_default_then_channel_then_override() {
    let registry = Registry::new();
    let mut entries = BTreeMap::new();
    entries.insert(
        "default".to_string(),
        ChannelOptions::new().folder("/d").extension("txt"),
    );
    entries.insert(
        "billing".to_string(),
        ChannelOptions::new().extension("csv").header("h"),
    );
    registry.load_configs(entries).unwrap();

    let plain = registry.resolve("billing", &ChannelOptions::new()).unwrap();
    assert_eq!(plain.config.folder, "/d");
    assert_eq!(plain.config.extension, "csv");
    assert_eq!(plain.config.header.as_deref(), Some("h"));

    let overridden = registry
        .resolve("billing", &ChannelOptions::new().extension("tsv"))
        .unwrap();
    assert_eq!(overridden.config.extension, "tsv");
    assert_eq!(overridden.config.folder, "/d");
}

#[test]
fn overrides_are_stored_back() {
    let registry = Registry::new();
    registry
        .resolve("sticky", &ChannelOptions::new().extension("out"))
        .unwrap();

    let again = registry.resolve("sticky", &ChannelOptions::new()).unwrap();
    assert_eq!(again.config.extension, "out");
}

#[test]
fn set_channel_config_uses_builtin_base() {
    let registry = Registry::new();
    registry.set_channel_config("simple", &ChannelOptions::new().pattern_row("{MESSAGE}"), None);

    let resolved = registry.resolve("simple", &ChannelOptions::new()).unwrap();
    assert_eq!(resolved.config.pattern_row, "{MESSAGE}");
    assert_eq!(resolved.config.extension, "log");
}

#[test]
fn set_channel_config_with_explicit_base() {
    let registry = Registry::new();
    let base = ChannelOptions::from(ChannelConfig::default()).extension("csv");
    registry.set_channel_config("based", &ChannelOptions::new().header("x"), Some(&base));

    let resolved = registry.resolve("based", &ChannelOptions::new()).unwrap();
    assert_eq!(resolved.config.extension, "csv");
    assert_eq!(resolved.config.header.as_deref(), Some("x"));
}

#[test]
fn set_default_returns_merged_default() {
    let registry = Registry::new();
    let config = registry.set_default(&ChannelOptions::new().format_date("%H:%M"));
    assert_eq!(config.format_date, "%H:%M");
    assert_eq!(config.extension, "log");
    assert_eq!(registry.default_config(), config);
}

#[test]
fn set_default_keeps_loaded_default_entry() {
    let registry = Registry::new();
    let mut entries = BTreeMap::new();
    entries.insert("default".to_string(), ChannelOptions::new().folder("/loaded"));
    registry.load_configs(entries).unwrap();

    let config = registry.set_default(&ChannelOptions::new().extension("txt"));

    assert_eq!(config.folder, "/loaded");
    assert_eq!(config.extension, "txt");
}

#[test]
fn set_default_reaches_only_channels_not_yet_stored() {
    let registry = Registry::new();
    let mut entries = BTreeMap::new();
    entries.insert("loaded".to_string(), ChannelOptions::new().extension("csv"));
    registry.load_configs(entries).unwrap();
    registry.resolve("early", &ChannelOptions::new()).unwrap();

    registry.set_default(&ChannelOptions::new().folder("/changed"));

    let builtin_folder = ChannelConfig::default().folder;
    for name in ["early", "loaded"] {
        let resolved = registry.resolve(name, &ChannelOptions::new()).unwrap();
        assert_eq!(resolved.config.folder, builtin_folder, "{name}");
    }
    let late = registry.resolve("late", &ChannelOptions::new()).unwrap();
    assert_eq!(late.config.folder, "/changed");
}

#[test]
fn reset_clears_entries_but_keeps_builtin() {
    let registry = Registry::new();
    registry.set_default(&ChannelOptions::new().folder("/kept"));
    registry.resolve("one", &ChannelOptions::new()).unwrap();

    registry.reset();
    assert!(registry.channel_names().is_empty());

    let resolved = registry.resolve("one", &ChannelOptions::new()).unwrap();
    assert_eq!(resolved.config.folder, "/kept");
}

#[test]
fn invalid_date_format_is_config_error() {
    let registry = Registry::new();
    let err = registry
        .resolve("bad", &ChannelOptions::new().format_date("%Y-%"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(!registry.channel_names().contains(&"bad".to_string()));
}

#[test]
fn empty_source_is_config_error() {
    let registry = Registry::new();
    let err = registry.load_configs(BTreeMap::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn registry_is_shareable_across_threads() {
    let registry = std::sync::Arc::new(Registry::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = std::sync::Arc::clone(&registry);
            std::thread::spawn(move || {
                registry
                    .resolve(&format!("worker-{i}"), &ChannelOptions::new())
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(registry.channel_names().len(), 5);
}
