//! Server-Sent Events (SSE) module

pub mod broadcaster;

pub use broadcaster::AlertBroadcaster;
