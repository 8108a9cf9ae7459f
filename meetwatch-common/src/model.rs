//! Meeting domain model
//!
//! Field names on the wire follow the original HTTP API (`scheduled_time`,
//! `is_recurring`, camelCase inside recurrence patterns).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Recurrence rule for a recurring meeting
///
/// Closed sum type over the three supported schedules, dispatched by pattern
/// matching in the resolver. JSON shape is tagged:
/// `{"type":"daily","interval":2}`,
/// `{"type":"weekly","interval":1,"daysOfWeek":[1,3]}`,
/// `{"type":"monthly","interval":1,"dayOfMonth":31}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecurrencePattern {
    /// Every `interval` days
    Daily { interval: i64 },

    /// Every `interval` weeks on the anniversary weekday, or on the next
    /// matching weekday when `daysOfWeek` is given (0 = Sunday .. 6 = Saturday)
    Weekly {
        interval: i64,
        #[serde(
            rename = "daysOfWeek",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        days_of_week: Option<Vec<u8>>,
    },

    /// Every `interval` months on `dayOfMonth`, clamped to the last day of
    /// shorter months
    Monthly {
        interval: i64,
        #[serde(rename = "dayOfMonth")]
        day_of_month: u32,
    },
}

/// Lifecycle state of a meeting occurrence at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingState {
    Upcoming,
    Starting,
    Live,
    Ended,
}

/// A stored meeting record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    /// SQLite rowid; stable and unique while the record is active
    pub id: i64,
    pub title: String,
    /// Absolute URL to join the meeting
    pub link: String,
    /// Base/first occurrence start (naive local time, whole seconds)
    pub scheduled_time: NaiveDateTime,
    /// Duration in minutes, positive
    pub duration: i64,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    /// Minutes before start to fire the "starting" alert (5, 10 or 15)
    pub alert_timing: i64,
    /// Soft-delete flag; inactive meetings are excluded from all queries
    pub is_active: bool,
    /// Maintained by the repository (SQLite CURRENT_TIMESTAMP), informational
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Validated input for creating or updating a meeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingDraft {
    pub title: String,
    pub link: String,
    pub scheduled_time: NaiveDateTime,
    pub duration: i64,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub alert_timing: i64,
}

/// Default minutes-before-start for the "starting" alert
pub const DEFAULT_ALERT_TIMING: i64 = 5;

/// Permitted values for `alert_timing`
pub const VALID_ALERT_TIMINGS: [i64; 3] = [5, 10, 15];
