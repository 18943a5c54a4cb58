//! Errors raised by the rendezvous client.

use browserd_core::RosterError;
use thiserror::Error;

/// Failures of rendezvous operations.
///
/// `Clone` so that poll failures can travel on the event channel while the
/// poll loop keeps running.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignalError {
    /// The HTTP request could not be completed.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered, but not in the expected shape: a non-success
    /// status, a missing peer id header, or a malformed roster record.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The operation needs a peer id and the client is not signed in.
    #[error("not signed in")]
    NotSignedIn,

    /// The configured base URL cannot be parsed.
    #[error("invalid rendezvous url {0:?}")]
    InvalidUrl(String),
}

impl From<RosterError> for SignalError {
    fn from(err: RosterError) -> Self {
        SignalError::Protocol(err.to_string())
    }
}
