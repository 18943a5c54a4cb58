//! Domain types for the rendezvous client.

pub mod config;
pub mod error;
pub mod events;

pub use config::SignalConfig;
pub use error::SignalError;
pub use events::SignalEvent;
