//! Notifications emitted by the poll loop.

use browserd_core::PeerRoster;

use crate::domain::SignalError;

#[derive(Debug, Clone, PartialEq)]
pub enum SignalEvent {
    /// The server sent a fresh roster. Replaces any previous roster.
    PeerUpdate(PeerRoster),

    /// Another peer relayed a message to us.
    PeerMessage { payload: String, sender_id: String },

    /// A poll failed. The loop keeps running; the receiver decides whether to
    /// tear the client down.
    Error(SignalError),
}
