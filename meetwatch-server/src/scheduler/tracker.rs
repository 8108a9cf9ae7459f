//! Transition tracking between scheduler ticks
//!
//! Holds the last-observed lifecycle state per meeting id. Owned by the
//! scheduler task and passed into each tick, so ticks are serialized by
//! construction. Never persisted.

use std::collections::{HashMap, HashSet};

use meetwatch_common::events::AlertKind;
use meetwatch_common::model::MeetingState;

#[derive(Debug, Default)]
pub struct TransitionTracker {
    states: HashMap<i64, MeetingState>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `new_state` for a meeting and return the alert its transition
    /// warrants, if any.
    ///
    /// Unchanged state never re-emits. On change: any transition into
    /// Starting alerts; any into Live alerts; into Ended alerts only when the
    /// previous observed state was exactly Live. A meeting that jumps from
    /// upcoming/starting straight to ended (e.g. downtime spanning the whole
    /// occurrence) gets no ended alert; that asymmetry is intended.
    pub fn observe(&mut self, meeting_id: i64, new_state: MeetingState) -> Option<AlertKind> {
        let previous = self.states.insert(meeting_id, new_state);
        if previous == Some(new_state) {
            return None;
        }

        match new_state {
            MeetingState::Starting => Some(AlertKind::MeetingStarting),
            // previous is never Live here: the unchanged case returned above
            MeetingState::Live => Some(AlertKind::MeetingLive),
            MeetingState::Ended if previous == Some(MeetingState::Live) => {
                Some(AlertKind::MeetingEnded)
            }
            _ => None,
        }
    }

    /// Drop entries for meetings no longer in the active set.
    ///
    /// Invariant after each tick's cleanup: tracked ids are a subset of the
    /// active meeting ids.
    pub fn retain_active(&mut self, active_ids: &HashSet<i64>) {
        self.states.retain(|id, _| active_ids.contains(id));
    }

    /// Last state observed for a meeting, if any
    pub fn last_state(&self, meeting_id: i64) -> Option<MeetingState> {
        self.states.get(&meeting_id).copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_observation_is_silent() {
        let mut tracker = TransitionTracker::new();
        assert_eq!(
            tracker.observe(1, MeetingState::Starting),
            Some(AlertKind::MeetingStarting)
        );
        assert_eq!(tracker.observe(1, MeetingState::Starting), None);
        assert_eq!(tracker.observe(1, MeetingState::Starting), None);
    }

    #[test]
    fn test_full_lifecycle_emits_three_alerts() {
        let mut tracker = TransitionTracker::new();
        assert_eq!(tracker.observe(1, MeetingState::Upcoming), None);
        assert_eq!(
            tracker.observe(1, MeetingState::Starting),
            Some(AlertKind::MeetingStarting)
        );
        assert_eq!(
            tracker.observe(1, MeetingState::Live),
            Some(AlertKind::MeetingLive)
        );
        assert_eq!(
            tracker.observe(1, MeetingState::Ended),
            Some(AlertKind::MeetingEnded)
        );
    }

    #[test]
    fn test_ended_without_live_is_suppressed() {
        let mut tracker = TransitionTracker::new();
        tracker.observe(1, MeetingState::Starting);
        assert_eq!(tracker.observe(1, MeetingState::Ended), None);
    }

    #[test]
    fn test_first_observation_ended_is_silent() {
        let mut tracker = TransitionTracker::new();
        assert_eq!(tracker.observe(1, MeetingState::Ended), None);
    }

    #[test]
    fn test_first_observation_live_alerts() {
        let mut tracker = TransitionTracker::new();
        assert_eq!(
            tracker.observe(1, MeetingState::Live),
            Some(AlertKind::MeetingLive)
        );
    }

    #[test]
    fn test_recurring_meeting_cycles_again() {
        // After one occurrence ends, the next resolved occurrence walks the
        // same transitions and alerts again
        let mut tracker = TransitionTracker::new();
        tracker.observe(1, MeetingState::Live);
        tracker.observe(1, MeetingState::Ended);
        assert_eq!(tracker.observe(1, MeetingState::Upcoming), None);
        assert_eq!(
            tracker.observe(1, MeetingState::Starting),
            Some(AlertKind::MeetingStarting)
        );
    }

    #[test]
    fn test_retain_drops_missing_ids() {
        let mut tracker = TransitionTracker::new();
        tracker.observe(1, MeetingState::Upcoming);
        tracker.observe(2, MeetingState::Live);
        tracker.observe(3, MeetingState::Ended);

        let active: HashSet<i64> = [2].into_iter().collect();
        tracker.retain_active(&active);

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.last_state(2), Some(MeetingState::Live));
        assert_eq!(tracker.last_state(1), None);
    }

    #[test]
    fn test_reused_id_starts_unbiased() {
        let mut tracker = TransitionTracker::new();
        tracker.observe(1, MeetingState::Live);
        tracker.retain_active(&HashSet::new());

        // Fresh entry: straight to Ended stays silent, as for any first look
        assert_eq!(tracker.observe(1, MeetingState::Ended), None);
    }
}
