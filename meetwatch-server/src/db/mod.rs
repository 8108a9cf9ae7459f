//! Database access layer
//!
//! Provides schema initialization and the meetings repository.

pub mod init;
pub mod meetings;
