//! Domain types for browserd sessions.

pub mod config;
pub mod events;
