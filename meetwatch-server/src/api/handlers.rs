//! HTTP request handlers
//!
//! Request validation mirrors what the scheduler relies on: positive duration,
//! absolute URL link, alert timing coerced into the allowed set, and recurring
//! meetings always carrying a pattern.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use meetwatch_common::model::{
    Meeting, MeetingDraft, RecurrencePattern, DEFAULT_ALERT_TIMING, VALID_ALERT_TIMINGS,
};
use meetwatch_common::time as clock;

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::db;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
    timestamp: String,
}

/// Create/update payload; `scheduled_time` arrives as a canonical timestamp
/// string and is validated here
#[derive(Debug, Deserialize)]
pub struct MeetingRequest {
    pub title: String,
    pub link: String,
    pub scheduled_time: String,
    pub duration: i64,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(default)]
    pub alert_timing: Option<i64>,
}

impl MeetingRequest {
    /// Validate into a draft ready for the repository
    fn into_draft(self) -> ApiResult<MeetingDraft> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::BadRequest("Title must not be empty".to_string()));
        }

        let link = self.link.trim().to_string();
        if Url::parse(&link).is_err() {
            return Err(ApiError::BadRequest("Invalid link format".to_string()));
        }

        let scheduled_time = clock::parse_timestamp(&self.scheduled_time)?;

        if self.duration <= 0 {
            return Err(ApiError::BadRequest(
                "Duration must be greater than 0".to_string(),
            ));
        }

        if self.is_recurring && self.recurrence_pattern.is_none() {
            return Err(ApiError::BadRequest(
                "Recurring meetings require a recurrence pattern".to_string(),
            ));
        }

        // Out-of-range values fall back to the default rather than erroring
        let alert_timing = match self.alert_timing {
            Some(t) if VALID_ALERT_TIMINGS.contains(&t) => t,
            _ => DEFAULT_ALERT_TIMING,
        };

        Ok(MeetingDraft {
            title,
            link,
            scheduled_time,
            duration: self.duration,
            is_recurring: self.is_recurring,
            recurrence_pattern: if self.is_recurring {
                self.recurrence_pattern
            } else {
                None
            },
            alert_timing,
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "meetwatch-server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: clock::format_timestamp(clock::now()),
    })
}

/// GET /api/meetings - all active meetings
pub async fn list_meetings(State(state): State<AppState>) -> ApiResult<Json<Vec<Meeting>>> {
    Ok(Json(db::meetings::list_active(&state.db).await?))
}

/// GET /api/meetings/active - meetings currently in their occurrence window
pub async fn list_live_meetings(State(state): State<AppState>) -> ApiResult<Json<Vec<Meeting>>> {
    Ok(Json(db::meetings::list_live(&state.db, clock::now()).await?))
}

/// GET /api/meetings/today
pub async fn list_today_meetings(State(state): State<AppState>) -> ApiResult<Json<Vec<Meeting>>> {
    Ok(Json(
        db::meetings::list_today(&state.db, clock::now()).await?,
    ))
}

/// GET /api/meetings/:id
pub async fn get_meeting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Meeting>> {
    db::meetings::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Meeting not found".to_string()))
}

/// POST /api/meetings
pub async fn create_meeting(
    State(state): State<AppState>,
    Json(request): Json<MeetingRequest>,
) -> ApiResult<(StatusCode, Json<Meeting>)> {
    let draft = request.into_draft()?;
    let meeting = db::meetings::create(&state.db, &draft).await?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

/// PUT /api/meetings/:id
pub async fn update_meeting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<MeetingRequest>,
) -> ApiResult<Json<Meeting>> {
    let draft = request.into_draft()?;
    db::meetings::update(&state.db, id, &draft)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Meeting not found".to_string()))
}

/// DELETE /api/meetings/:id - soft delete
pub async fn delete_meeting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    if !db::meetings::soft_delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Meeting not found".to_string()));
    }
    Ok(Json(json!({ "message": "Meeting deleted successfully" })))
}
