//! Session-level error type.

use browserd_core::InputProtocolError;
use browserd_signal::SignalError;
use thiserror::Error;

use crate::application::replay_input::InjectionError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// A rendezvous operation failed.
    #[error("signaling failed: {0}")]
    Signal(#[from] SignalError),

    /// The roster holds no peer other than ourselves.
    #[error("no counterpart found in roster")]
    NotFound,

    /// The peer-connection provider rejected an operation.
    #[error("peer connection error: {0}")]
    Peer(String),

    /// The stream provider could not enumerate devices or create a stream.
    #[error("stream error: {0}")]
    Stream(String),

    /// The stream provider reported no capture devices.
    #[error("unable to find capture devices")]
    NoDevices,

    /// `boot` was called on an app that already booted.
    #[error("session already booted")]
    AlreadyBooted,

    /// A data-channel message could not be decoded.
    #[error("input decode failed: {0}")]
    Input(#[from] InputProtocolError),

    /// A decoded event could not be injected.
    #[error("input injection failed: {0}")]
    Injection(#[from] InjectionError),

    /// A signaling payload was not valid JSON.
    #[error("invalid signaling payload: {0}")]
    Json(#[from] serde_json::Error),
}
