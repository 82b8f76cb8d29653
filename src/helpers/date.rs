//! Date helper functions

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Format used for default publish dates
pub const PUBLISH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date as `YYYY-MM-DD`
pub fn today() -> String {
    Local::now().format(PUBLISH_DATE_FORMAT).to_string()
}

/// Parse a publish date string in the formats posts use in practice
///
/// Date-only values resolve to midnight. RFC 3339 values are normalised to UTC
/// so posts written in different offsets still compare correctly.
pub fn parse_publish_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}

/// Format a publish date in long form (like "December 20, 2024")
///
/// Unparsable input is returned as-is.
pub fn full_date(s: &str) -> String {
    match parse_publish_date(s) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => s.to_string(),
    }
}
