//! Events flowing out of the peer-connection provider and out of a session.

use browserd_signal::SignalError;
use serde_json::Value;

/// Opaque handle to a media stream owned by the peer-connection or stream
/// provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaHandle(pub String);

impl MediaHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Which side starts the offer/answer exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerRole {
    /// Creates the offer. Used by the consumer.
    Initiator,
    /// Waits for an offer. Used by the provider.
    Responder,
}

/// Notifications from the peer-connection provider.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerEvent {
    /// Transport failure inside the provider.
    Error(String),
    Connect,
    Disconnect,
    /// Outgoing signaling payload (offer, answer, or nested candidate).
    Signal(Value),
    /// Bytes received on the data channel.
    Data(Vec<u8>),
    /// A remote media stream arrived.
    Stream(MediaHandle),
}

/// Notifications surfaced by a running session to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected,
    Disconnected,
    /// The peer-connection provider reported an error. The session keeps
    /// running; the owner decides whether to tear it down.
    PeerError(String),
    /// The remote side's media arrived.
    RemoteStream(MediaHandle),
    /// A rendezvous poll failed. Polling continues; the owner decides
    /// whether to shut the session down.
    SignalError(SignalError),
}
