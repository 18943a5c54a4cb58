//! In-memory collaborators.
//!
//! `channel_source` is usable in production wiring. `mock` records calls for
//! tests and demos.

pub mod channel_source;
pub mod mock;
