//! SSE endpoint streaming meeting alerts
//!
//! Clients connect to GET /api/events and receive one event per detected
//! lifecycle transition. A hello event confirms the connection; keep-alive
//! comments hold idle connections open.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use tracing::info;

use super::AppState;

/// GET /api/events - SSE alert stream
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!(
        "New SSE client connected, total clients: {}",
        state.broadcaster.client_count() + 1
    );

    let hello = stream::once(async {
        Ok(Event::default()
            .event("connected")
            .data(r#"{"type":"connected","message":"Connected to meeting alerts"}"#))
    });

    let stream = hello.chain(state.broadcaster.subscribe_stream());

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keep-alive"),
    )
}
