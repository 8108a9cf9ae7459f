//! Timestamp utilities
//!
//! Meetings carry naive local timestamps at second granularity, stored and
//! exchanged in `YYYY-MM-DDTHH:MM:SS` form.

use chrono::{Local, NaiveDateTime, Timelike};

use crate::{Error, Result};

/// Canonical timestamp format (second granularity, no timezone)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Get current local wall-clock time, truncated to whole seconds
pub fn now() -> NaiveDateTime {
    truncate_to_seconds(Local::now().naive_local())
}

/// Discard fractional seconds from a timestamp
pub fn truncate_to_seconds(t: NaiveDateTime) -> NaiveDateTime {
    t.with_nanosecond(0).unwrap_or(t)
}

/// Parse a timestamp in canonical form
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| Error::InvalidInput(format!("Invalid timestamp '{}': {}", s, e)))
}

/// Format a timestamp in canonical form
pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}
