//! Meeting state-transition scheduler
//!
//! Once per minute: fetch all active meetings, resolve each one's next
//! occurrence, classify its lifecycle state, detect transitions against the
//! previous tick, and broadcast the resulting alerts to SSE subscribers.
//!
//! Failure containment, narrowest scope first: a broken subscriber only loses
//! its own stream, a bad recurrence pattern skips that meeting for the tick,
//! a failed repository fetch skips the whole tick. The loop itself only stops
//! at process shutdown.

pub mod classify;
pub mod resolver;
pub mod tracker;

use std::collections::HashSet;
use std::time::Duration;

use chrono::NaiveDateTime;
use sqlx::{Pool, Sqlite};
use tokio::time;
use tracing::{debug, error, info, warn};

use meetwatch_common::events::AlertEvent;
use meetwatch_common::model::Meeting;
use meetwatch_common::time as clock;
use meetwatch_common::Result;

use crate::db;
use crate::sse::AlertBroadcaster;

use classify::classify;
use tracker::TransitionTracker;

/// Scheduler cadence: one evaluation pass per minute
const TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Run the scheduler until process shutdown.
///
/// The transition tracker lives on this task's stack; nothing else touches it,
/// so two ticks can never race.
pub async fn run(db: Pool<Sqlite>, broadcaster: AlertBroadcaster) {
    let mut tracker = TransitionTracker::new();
    let mut interval = time::interval(TICK_INTERVAL);

    info!(
        "Scheduler started, checking meetings every {}s",
        TICK_INTERVAL.as_secs()
    );

    loop {
        interval.tick().await;
        let now = clock::now();

        let meetings = match db::meetings::list_active(&db).await {
            Ok(meetings) => meetings,
            Err(e) => {
                error!("Skipping tick, failed to fetch meetings: {}", e);
                continue;
            }
        };

        let alerts = process_tick(&meetings, &mut tracker, now);
        for alert in alerts {
            info!("{}", alert.message);
            broadcaster.broadcast_lossy(alert);
        }
    }
}

/// One evaluation pass over the active meeting set.
///
/// Classification and transition detection happen here; delivery is left to
/// the caller, which keeps the pass free of timers and transport and directly
/// testable. Ends with tracker cleanup so state for vanished meetings is
/// dropped the same tick they disappear.
pub fn process_tick(
    meetings: &[Meeting],
    tracker: &mut TransitionTracker,
    now: NaiveDateTime,
) -> Vec<AlertEvent> {
    let mut alerts = Vec::new();

    for meeting in meetings {
        match evaluate_meeting(meeting, tracker, now) {
            Ok(Some(alert)) => alerts.push(alert),
            Ok(None) => {}
            Err(e) => warn!(
                "Skipping meeting {} (\"{}\") this tick: {}",
                meeting.id, meeting.title, e
            ),
        }
    }

    let active_ids: HashSet<i64> = meetings.iter().map(|m| m.id).collect();
    tracker.retain_active(&active_ids);
    debug!(
        "Tick complete: {} meetings, {} alerts",
        meetings.len(),
        alerts.len()
    );

    alerts
}

fn evaluate_meeting(
    meeting: &Meeting,
    tracker: &mut TransitionTracker,
    now: NaiveDateTime,
) -> Result<Option<AlertEvent>> {
    let occurrence = resolver::resolve_occurrence(meeting, now)?;
    let classification = classify(occurrence, meeting.duration, meeting.alert_timing, now);

    let Some(kind) = tracker.observe(meeting.id, classification.state) else {
        return Ok(None);
    };

    Ok(Some(AlertEvent::new(
        kind,
        meeting,
        occurrence,
        classification.minutes_until_start,
        now,
    )))
}
