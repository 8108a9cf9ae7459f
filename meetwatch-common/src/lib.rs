//! # Meetwatch Common Library
//!
//! Shared code for the meetwatch service crates including:
//! - Meeting domain model and recurrence pattern types
//! - Lifecycle states and alert event types
//! - Configuration resolution
//! - Error types
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod time;

pub use error::{Error, Result};
