use chrono::{DateTime, Utc};

/// Timestamp layout accepted by the events API's `startDateTime` filter
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format a UTC instant as `YYYY-MM-DDTHH:MM:SSZ`
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}
