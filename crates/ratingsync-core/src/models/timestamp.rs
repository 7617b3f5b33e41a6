//! Canonical timestamp keys
//!
//! Every series is keyed by a wall-clock string in one fixed zone, UTC+05:30,
//! so that records from sites reporting in different zones line up on a graph.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Format of every timestamp key in a series.
pub const TIMESTAMP_KEY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CANONICAL_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The fixed offset all timestamp keys are rendered in.
pub fn canonical_offset() -> FixedOffset {
    FixedOffset::east_opt(CANONICAL_OFFSET_SECS).expect("Invalid canonical offset")
}

/// Render a wall-clock time that is already in the canonical zone.
pub fn canonical_key_from_naive(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_KEY_FORMAT).to_string()
}

/// Shift a UTC instant into the canonical zone and render it.
pub fn canonical_key_from_utc(value: DateTime<Utc>) -> String {
    canonical_offset()
        .from_utc_datetime(&value.naive_utc())
        .format(TIMESTAMP_KEY_FORMAT)
        .to_string()
}
