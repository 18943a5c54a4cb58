//! The rendezvous capability trait.
//!
//! Consumers (the negotiation orchestrator, the provider and consumer roles)
//! depend on this trait rather than on [`crate::SignalingClient`] so that they
//! can be exercised against in-memory doubles. Notifications are not part of
//! the contract; they arrive on the channel handed out at construction.

use async_trait::async_trait;
use browserd_core::PeerRoster;

use crate::domain::SignalError;

/// Request/response operations against a rendezvous server.
///
/// Callers serialize `sign_in`, `sign_out`, and `destroy` on one instance.
#[async_trait]
pub trait RendezvousClient: Send + Sync {
    /// Peer id assigned at sign-in, `None` while signed out.
    fn id(&self) -> Option<String>;

    /// Registers under `peer_name` and starts polling.
    ///
    /// # Errors
    ///
    /// [`SignalError::Network`] if the request fails, [`SignalError::Protocol`]
    /// on a non-success status, a missing id header, or a malformed roster.
    async fn sign_in(&self, peer_name: &str) -> Result<PeerRoster, SignalError>;

    /// Relays `data` to `peer_id` through the server.
    async fn send(&self, data: &str, peer_id: &str) -> Result<(), SignalError>;

    /// Deregisters from the server, then calls [`RendezvousClient::destroy`].
    async fn sign_out(&self) -> Result<(), SignalError>;

    /// Stops polling and forgets the peer id. Idempotent.
    fn destroy(&self);
}
