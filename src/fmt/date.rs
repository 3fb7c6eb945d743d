//! strftime helpers that never panic on a bad format string.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// True when every item of `format` is understood by chrono.
#[must_use]
pub fn is_valid_date_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Formats `now` with `format`; an invalid format is written back verbatim
/// instead of panicking inside `Display`.
#[must_use]
pub fn format_date<Tz>(now: &DateTime<Tz>, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if !is_valid_date_format(format) {
        return format.to_string();
    }
    now.format(format).to_string()
}
