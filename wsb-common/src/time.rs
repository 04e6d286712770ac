//! Timestamp utilities

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC calendar date, used for weekly windows
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Convert a unix timestamp (seconds) into a UTC-offset timestamp
///
/// Out-of-range values fall back to the epoch.
pub fn from_unix_seconds(secs: i64) -> DateTime<FixedOffset> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or_default()
        .fixed_offset()
}
