#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let (_, rest) = chanlog::config::extract_sources(data);
    if let Ok(table) = rest.parse::<toml::Table>() {
        let _ = chanlog::config::load_source(table.into());
    }
});
