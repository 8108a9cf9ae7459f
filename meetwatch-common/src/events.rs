//! Alert event types broadcast to SSE subscribers
//!
//! Events are transient wire records: one per detected lifecycle transition,
//! never persisted, no replay for late subscribers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::Meeting;

/// Alert category, one per transition the tracker emits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    MeetingStarting,
    MeetingLive,
    MeetingEnded,
}

impl AlertKind {
    /// Wire name, also used as the SSE event field
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::MeetingStarting => "meeting-starting",
            AlertKind::MeetingLive => "meeting-live",
            AlertKind::MeetingEnded => "meeting-ended",
        }
    }
}

/// Meeting fields carried inside an alert event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMeeting {
    pub id: i64,
    pub title: String,
    pub link: String,
    /// The resolved occurrence start, not the base schedule
    pub scheduled_time: NaiveDateTime,
    pub duration: i64,
    pub alert_timing: i64,
}

/// One alert, broadcast to every connected subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub meeting: AlertMeeting,
    pub message: String,
    /// Tick time at which the transition was detected
    pub timestamp: NaiveDateTime,
}

impl AlertEvent {
    /// Build the alert for a detected transition.
    ///
    /// `minutes_until_start` is only meaningful for starting alerts, where it
    /// feeds the human-readable message.
    pub fn new(
        kind: AlertKind,
        meeting: &Meeting,
        occurrence: NaiveDateTime,
        minutes_until_start: i64,
        now: NaiveDateTime,
    ) -> Self {
        let message = match kind {
            AlertKind::MeetingStarting => format!(
                "Meeting \"{}\" is starting in {} minute(s)",
                meeting.title, minutes_until_start
            ),
            AlertKind::MeetingLive => format!("Meeting \"{}\" is now live", meeting.title),
            AlertKind::MeetingEnded => format!("Meeting \"{}\" has ended", meeting.title),
        };

        Self {
            kind,
            meeting: AlertMeeting {
                id: meeting.id,
                title: meeting.title.clone(),
                link: meeting.link.clone(),
                scheduled_time: occurrence,
                duration: meeting.duration,
                alert_timing: meeting.alert_timing,
            },
            message,
            timestamp: now,
        }
    }
}
