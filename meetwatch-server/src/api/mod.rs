//! REST API for the meeting alert service
//!
//! Meeting CRUD plus the SSE event stream. The HTTP layer is plumbing around
//! the repository and broadcaster; the scheduler never depends on it.

pub mod error;
pub mod handlers;
pub mod sse;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::{Pool, Sqlite};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::sse::AlertBroadcaster;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub broadcaster: AlertBroadcaster,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        // SSE events
        .route("/api/events", get(sse::event_stream))
        // Meeting CRUD
        .route("/api/meetings", get(handlers::list_meetings))
        .route("/api/meetings", post(handlers::create_meeting))
        .route("/api/meetings/active", get(handlers::list_live_meetings))
        .route("/api/meetings/today", get(handlers::list_today_meetings))
        .route("/api/meetings/:id", get(handlers::get_meeting))
        .route("/api/meetings/:id", put(handlers::update_meeting))
        .route("/api/meetings/:id", delete(handlers::delete_meeting))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
