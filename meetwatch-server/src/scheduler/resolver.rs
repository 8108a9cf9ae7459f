//! Next-occurrence resolution for recurring meetings
//!
//! Pure date arithmetic: given a meeting's base schedule and recurrence rule,
//! find the soonest occurrence start that is not in the past. Advancement is
//! capped so a misconfigured pattern surfaces as an error instead of spinning.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use meetwatch_common::model::{Meeting, RecurrencePattern};
use meetwatch_common::{Error, Result};

/// Upper bound on advancement steps before the pattern is treated as
/// misconfigured. Weekly day-of-week search steps one day at a time, so this
/// still resolves schedules roughly 27 years stale.
const MAX_ADVANCE_STEPS: u32 = 10_000;

/// Compute the next occurrence start at or after `now`.
///
/// Non-recurring meetings (and recurring ones whose base time is still in the
/// future) resolve to `scheduled_time` unchanged. Results are at second
/// granularity, strictly after `now` once advancement kicks in.
pub fn resolve_occurrence(meeting: &Meeting, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let base = meeting.scheduled_time;

    if !meeting.is_recurring {
        return Ok(base);
    }
    let Some(pattern) = &meeting.recurrence_pattern else {
        return Ok(base);
    };
    if base > now {
        return Ok(base);
    }

    match pattern {
        RecurrencePattern::Daily { interval } => {
            let days = positive_interval(*interval)?;
            advance(base, now, |t| t.checked_add_days(Days::new(days)))
        }

        RecurrencePattern::Weekly {
            interval,
            days_of_week,
        } => {
            let weeks = positive_interval(*interval)?;
            match days_of_week {
                // Step one day at a time until a listed weekday lands after now;
                // interval beyond the 1-day stepping is intentionally ignored
                Some(days) if !days.is_empty() => next_matching_weekday(base, days, now),
                _ => {
                    let days = weeks.checked_mul(7).ok_or_else(|| {
                        Error::InvalidPattern(format!("interval {} out of range", interval))
                    })?;
                    advance(base, now, |t| t.checked_add_days(Days::new(days)))
                }
            }
        }

        RecurrencePattern::Monthly {
            interval,
            day_of_month,
        } => {
            let months = u32::try_from(positive_interval(*interval)?).map_err(|_| {
                Error::InvalidPattern(format!("interval {} out of range", interval))
            })?;
            if *day_of_month < 1 || *day_of_month > 31 {
                return Err(Error::InvalidPattern(format!(
                    "dayOfMonth must be 1-31, got {}",
                    day_of_month
                )));
            }
            advance(base, now, |t| add_months_clamped(t, months, *day_of_month))
        }
    }
}

fn positive_interval(interval: i64) -> Result<u64> {
    if interval <= 0 {
        return Err(Error::InvalidPattern(format!(
            "interval must be positive, got {}",
            interval
        )));
    }
    Ok(interval as u64)
}

/// Apply `step` until the result is strictly after `now`, bounded by
/// MAX_ADVANCE_STEPS
fn advance<F>(start: NaiveDateTime, now: NaiveDateTime, mut step: F) -> Result<NaiveDateTime>
where
    F: FnMut(NaiveDateTime) -> Option<NaiveDateTime>,
{
    let mut t = start;
    for _ in 0..MAX_ADVANCE_STEPS {
        t = step(t)
            .ok_or_else(|| Error::InvalidPattern("date arithmetic out of range".to_string()))?;
        if t > now {
            return Ok(t);
        }
    }
    Err(Error::InvalidPattern(format!(
        "no occurrence found within {} steps",
        MAX_ADVANCE_STEPS
    )))
}

/// Daily stepping constrained to a weekday set (0 = Sunday .. 6 = Saturday)
fn next_matching_weekday(
    start: NaiveDateTime,
    days_of_week: &[u8],
    now: NaiveDateTime,
) -> Result<NaiveDateTime> {
    let mut t = start;
    for _ in 0..MAX_ADVANCE_STEPS {
        t = t
            .checked_add_days(Days::new(1))
            .ok_or_else(|| Error::InvalidPattern("date arithmetic out of range".to_string()))?;
        let weekday = t.weekday().num_days_from_sunday() as u8;
        if t > now && days_of_week.contains(&weekday) {
            return Ok(t);
        }
    }
    // Reached when no listed index is a real weekday (e.g. all > 6)
    Err(Error::InvalidPattern(format!(
        "no matching weekday in {:?}",
        days_of_week
    )))
}

/// Add whole months, setting the day to `min(day_of_month, last day of the
/// target month)`
fn add_months_clamped(
    t: NaiveDateTime,
    months: u32,
    day_of_month: u32,
) -> Option<NaiveDateTime> {
    let total = t.year() as i64 * 12 + t.month0() as i64 + months as i64;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = total.rem_euclid(12) as u32 + 1;

    let day = day_of_month.min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(t.time()))
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next.and_then(|d| d.pred_opt()).map(|d| d.day())
}
