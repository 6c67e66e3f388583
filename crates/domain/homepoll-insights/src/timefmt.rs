//! Phoenix-local timestamp rendering for the admin view.
//!
//! Arizona does not observe daylight saving, so Phoenix is a fixed
//! UTC−7 all year and a constant offset is exact; no tz database
//! needed.

use chrono::{DateTime, FixedOffset, Utc};

const PHOENIX_OFFSET_HOURS: i32 = 7;

/// Marker rendered for absent or unparseable timestamps.
pub const INVALID_DATE: &str = "Invalid date";

/// Long-form Phoenix wall-clock time: `January 5, 2025, 3:04 PM`.
pub fn phoenix_time(timestamp: Option<DateTime<Utc>>) -> String {
    let Some(timestamp) = timestamp else {
        return INVALID_DATE.to_string();
    };
    let phoenix = FixedOffset::west_opt(PHOENIX_OFFSET_HOURS * 3600).unwrap();
    timestamp
        .with_timezone(&phoenix)
        .format("%B %-d, %Y, %-I:%M %p")
        .to_string()
}
