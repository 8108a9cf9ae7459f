//! # Meetwatch Server
//!
//! Meeting alert service: stores scheduled meetings in SQLite and emits
//! real-time SSE alerts as meetings approach, start, and end.
//!
//! **Architecture:** a once-per-minute scheduler resolves each active
//! meeting's next occurrence, classifies its lifecycle state, detects
//! transitions against the previous tick, and broadcasts at most one alert
//! per transition to all connected SSE clients. An axum HTTP API provides
//! meeting CRUD and the event stream.

pub mod api;
pub mod db;
pub mod scheduler;
pub mod sse;
