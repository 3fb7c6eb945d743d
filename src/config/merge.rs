//! Recursive overlay of raw TOML tables, used when include files are folded
//! into the file that sources them.

use toml::{Table, Value};

/// Merges `overlay` into `base` key by key. Two tables at the same key merge
/// recursively; any other pair is resolved by the overlay value replacing the
/// base value outright (arrays are replaced, not concatenated).
pub fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Non-mutating form of [`deep_merge`].
#[must_use]
pub fn deep_merged(base: &Table, overlay: &Table) -> Table {
    let mut merged = base.clone();
    deep_merge(&mut merged, overlay.clone());
    merged
}
