//! Meetings repository
//!
//! All queries exclude soft-deleted records; the scheduler's per-tick fetch is
//! `list_active`, ordered by scheduled time ascending.

use chrono::NaiveDateTime;
use meetwatch_common::model::{Meeting, MeetingDraft, RecurrencePattern};
use meetwatch_common::time::{format_timestamp, parse_timestamp};
use meetwatch_common::{Error, Result};
use sqlx::{FromRow, Pool, Sqlite};
use tracing::warn;

/// Raw row as stored; converted to the domain model after fetch
#[derive(Debug, FromRow)]
struct MeetingRow {
    id: i64,
    title: String,
    link: String,
    scheduled_time: String,
    duration: i64,
    is_recurring: i64,
    recurrence_pattern: Option<String>,
    alert_timing: i64,
    is_active: i64,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl MeetingRow {
    fn into_meeting(self) -> Result<Meeting> {
        let recurrence_pattern = self
            .recurrence_pattern
            .as_deref()
            .map(serde_json::from_str::<RecurrencePattern>)
            .transpose()
            .map_err(|e| {
                Error::Internal(format!(
                    "Malformed recurrence pattern for meeting {}: {}",
                    self.id, e
                ))
            })?;

        Ok(Meeting {
            id: self.id,
            title: self.title,
            link: self.link,
            scheduled_time: parse_timestamp(&self.scheduled_time)?,
            duration: self.duration,
            is_recurring: self.is_recurring != 0,
            recurrence_pattern,
            alert_timing: self.alert_timing,
            is_active: self.is_active != 0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, title, link, scheduled_time, duration, is_recurring, \
     recurrence_pattern, alert_timing, is_active, created_at, updated_at";

fn pattern_json(draft: &MeetingDraft) -> Result<Option<String>> {
    draft
        .recurrence_pattern
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| Error::Internal(format!("Failed to serialize recurrence pattern: {}", e)))
}

/// All active meetings, ordered by scheduled time ascending.
///
/// A row that fails conversion (malformed timestamp or pattern JSON) is
/// logged and skipped rather than failing the whole fetch; the scheduler
/// keeps evaluating the remaining meetings.
pub async fn list_active(db: &Pool<Sqlite>) -> Result<Vec<Meeting>> {
    let rows: Vec<MeetingRow> = sqlx::query_as(&format!(
        "SELECT {SELECT_COLUMNS} FROM meetings WHERE is_active = 1 ORDER BY scheduled_time ASC"
    ))
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id;
            match row.into_meeting() {
                Ok(meeting) => Some(meeting),
                Err(e) => {
                    warn!("Skipping malformed meeting row {}: {}", id, e);
                    None
                }
            }
        })
        .collect())
}

/// Look up one active meeting by id
pub async fn find_by_id(db: &Pool<Sqlite>, id: i64) -> Result<Option<Meeting>> {
    let row: Option<MeetingRow> = sqlx::query_as(&format!(
        "SELECT {SELECT_COLUMNS} FROM meetings WHERE id = ? AND is_active = 1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    row.map(MeetingRow::into_meeting).transpose()
}

/// Meetings whose base schedule has started but not yet ended at `now`
pub async fn list_live(db: &Pool<Sqlite>, now: NaiveDateTime) -> Result<Vec<Meeting>> {
    let now_str = format_timestamp(now);
    let rows: Vec<MeetingRow> = sqlx::query_as(&format!(
        "SELECT {SELECT_COLUMNS} FROM meetings
         WHERE is_active = 1
         AND scheduled_time <= ?
         AND datetime(scheduled_time, '+' || duration || ' minutes') > ?
         ORDER BY scheduled_time DESC"
    ))
    .bind(&now_str)
    .bind(&now_str)
    .fetch_all(db)
    .await?;

    rows.into_iter().map(MeetingRow::into_meeting).collect()
}

/// Meetings scheduled within the calendar day containing `now`
pub async fn list_today(db: &Pool<Sqlite>, now: NaiveDateTime) -> Result<Vec<Meeting>> {
    let day = now.date();
    let day_start = day.and_hms_opt(0, 0, 0).unwrap_or(now);
    let day_end = day.and_hms_opt(23, 59, 59).unwrap_or(now);

    let rows: Vec<MeetingRow> = sqlx::query_as(&format!(
        "SELECT {SELECT_COLUMNS} FROM meetings
         WHERE is_active = 1
         AND scheduled_time >= ?
         AND scheduled_time <= ?
         ORDER BY scheduled_time ASC"
    ))
    .bind(format_timestamp(day_start))
    .bind(format_timestamp(day_end))
    .fetch_all(db)
    .await?;

    rows.into_iter().map(MeetingRow::into_meeting).collect()
}

/// Insert a new meeting, returning the stored record
pub async fn create(db: &Pool<Sqlite>, draft: &MeetingDraft) -> Result<Meeting> {
    let result = sqlx::query(
        "INSERT INTO meetings
         (title, link, scheduled_time, duration, is_recurring, recurrence_pattern, alert_timing)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&draft.title)
    .bind(&draft.link)
    .bind(format_timestamp(draft.scheduled_time))
    .bind(draft.duration)
    .bind(draft.is_recurring as i64)
    .bind(pattern_json(draft)?)
    .bind(draft.alert_timing)
    .execute(db)
    .await?;

    let id = result.last_insert_rowid();
    find_by_id(db, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Meeting {} vanished after insert", id)))
}

/// Update an active meeting; returns the updated record, or None if it does
/// not exist (or was soft-deleted)
pub async fn update(db: &Pool<Sqlite>, id: i64, draft: &MeetingDraft) -> Result<Option<Meeting>> {
    let result = sqlx::query(
        "UPDATE meetings
         SET title = ?, link = ?, scheduled_time = ?, duration = ?,
             is_recurring = ?, recurrence_pattern = ?, alert_timing = ?,
             updated_at = CURRENT_TIMESTAMP
         WHERE id = ? AND is_active = 1",
    )
    .bind(&draft.title)
    .bind(&draft.link)
    .bind(format_timestamp(draft.scheduled_time))
    .bind(draft.duration)
    .bind(draft.is_recurring as i64)
    .bind(pattern_json(draft)?)
    .bind(draft.alert_timing)
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(db, id).await
}

/// Soft-delete a meeting; returns false if no active record matched
pub async fn soft_delete(db: &Pool<Sqlite>, id: i64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE meetings SET is_active = 0, updated_at = CURRENT_TIMESTAMP
         WHERE id = ? AND is_active = 1",
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
