//! Meeting lifecycle classification
//!
//! Operates on the already-resolved occurrence, never the base schedule.
//! Priority order matters: live and ended are checked before starting.

use chrono::{Duration, NaiveDateTime};
use meetwatch_common::model::MeetingState;

/// Result of classifying one occurrence at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub state: MeetingState,
    /// Whole minutes until the occurrence starts (floor); negative once started
    pub minutes_until_start: i64,
}

/// Derive the lifecycle state of an occurrence window at `now`.
///
/// Live is inclusive on both boundaries (`start <= now <= end`); ended is
/// strictly after the end; starting covers `0 < minutes_until_start <=
/// alert_timing`; everything else is upcoming.
pub fn classify(
    occurrence_start: NaiveDateTime,
    duration_minutes: i64,
    alert_timing: i64,
    now: NaiveDateTime,
) -> Classification {
    let occurrence_end = occurrence_start + Duration::minutes(duration_minutes);
    let minutes_until_start = (occurrence_start - now).num_minutes();

    let state = if now >= occurrence_start && now <= occurrence_end {
        MeetingState::Live
    } else if now > occurrence_end {
        MeetingState::Ended
    } else if minutes_until_start > 0 && minutes_until_start <= alert_timing {
        MeetingState::Starting
    } else {
        MeetingState::Upcoming
    };

    Classification {
        state,
        minutes_until_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetwatch_common::time::parse_timestamp;

    fn dt(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    const START: &str = "2024-01-05T10:00:00";

    #[test]
    fn test_starting_within_alert_window() {
        let c = classify(dt(START), 30, 10, dt("2024-01-05T09:55:00"));
        assert_eq!(c.state, MeetingState::Starting);
        assert_eq!(c.minutes_until_start, 5);
    }

    #[test]
    fn test_upcoming_outside_alert_window() {
        let c = classify(dt(START), 30, 10, dt("2024-01-05T09:40:00"));
        assert_eq!(c.state, MeetingState::Upcoming);
        assert_eq!(c.minutes_until_start, 20);
    }

    #[test]
    fn test_live_within_duration() {
        let c = classify(dt(START), 30, 10, dt("2024-01-05T10:10:00"));
        assert_eq!(c.state, MeetingState::Live);
    }

    #[test]
    fn test_live_at_exact_start_and_end() {
        assert_eq!(
            classify(dt(START), 30, 10, dt(START)).state,
            MeetingState::Live
        );
        assert_eq!(
            classify(dt(START), 30, 10, dt("2024-01-05T10:30:00")).state,
            MeetingState::Live
        );
    }

    #[test]
    fn test_ended_after_duration() {
        let c = classify(dt(START), 30, 10, dt("2024-01-05T10:40:00"));
        assert_eq!(c.state, MeetingState::Ended);
    }

    #[test]
    fn test_seconds_before_start_is_not_starting() {
        // 30 seconds out floors to 0 minutes, which is outside the window
        let c = classify(dt(START), 30, 10, dt("2024-01-05T09:59:30"));
        assert_eq!(c.state, MeetingState::Upcoming);
        assert_eq!(c.minutes_until_start, 0);
    }

    #[test]
    fn test_alert_window_boundary_inclusive() {
        let c = classify(dt(START), 30, 10, dt("2024-01-05T09:50:00"));
        assert_eq!(c.state, MeetingState::Starting);
        assert_eq!(c.minutes_until_start, 10);
    }
}
