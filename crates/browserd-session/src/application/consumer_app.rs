//! Consumer role: finds the provider, plays its stream, and forwards local
//! pointer input over the data channel.

use std::sync::Arc;

use async_trait::async_trait;
use browserd_core::protocol::encoder::{PointerPress, SurfaceOrigin};
use browserd_core::{encode_pointer, to_wire_bytes};
use browserd_signal::{RendezvousClient, SignalEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::negotiation::{NegotiationOrchestrator, PeerConnectionProvider, PeerInit};
use crate::domain::config::IceServer;
use crate::domain::events::{MediaHandle, SessionEvent};
use crate::error::SessionError;

/// Local pointer presses and releases on the playback surface.
#[async_trait]
pub trait PointerSource: Send {
    /// The next press or release with the surface origin at that moment.
    /// `None` once the surface is gone.
    async fn next_press(&mut self) -> Option<(PointerPress, SurfaceOrigin)>;
}

/// Encodes every press from `source` and sends it over `peer`'s data channel
/// until the source is exhausted. Returns how many messages were sent.
///
/// A press that fails to encode or send is logged and skipped.
pub async fn forward_pointer_input<S>(source: &mut S, peer: &dyn PeerConnectionProvider) -> usize
where
    S: PointerSource + ?Sized,
{
    let mut sent = 0;
    while let Some((press, origin)) = source.next_press().await {
        let encoded = encode_pointer(&press, origin);
        let bytes = match to_wire_bytes(&encoded.message) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(event = encoded.event.name(), error = %e, "failed to encode pointer input");
                continue;
            }
        };
        match peer.send(&bytes).await {
            Ok(()) => sent += 1,
            Err(e) => warn!(event = encoded.event.name(), error = %e, "failed to send pointer input"),
        }
    }
    debug!(sent, "pointer source exhausted");
    sent
}

/// Playback-side application.
pub struct ConsumerApp {
    signal: Arc<dyn RendezvousClient>,
    peer: Arc<dyn PeerConnectionProvider>,
    ice_servers: Vec<IceServer>,
}

impl ConsumerApp {
    pub fn new(
        signal: Arc<dyn RendezvousClient>,
        peer: Arc<dyn PeerConnectionProvider>,
        ice_servers: Vec<IceServer>,
    ) -> Self {
        Self {
            signal,
            peer,
            ice_servers,
        }
    }

    /// Signs in under a random name, binds the first other peer on the
    /// roster, and starts negotiating as initiator.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`] when nobody else is signed in. The
    /// rendezvous session is destroyed before returning it, so nothing is
    /// left polling. Sign-in and peer initialization failures propagate
    /// unchanged.
    pub async fn connect(
        &self,
        signal_events: mpsc::UnboundedReceiver<SignalEvent>,
    ) -> Result<ConsumerSession, SessionError> {
        let name = Uuid::new_v4().to_string();
        let roster = self.signal.sign_in(&name).await?;

        let (mut orchestrator, events) =
            NegotiationOrchestrator::new(Arc::clone(&self.signal), Arc::clone(&self.peer));
        let remote_peer_id = match orchestrator.discover_counterpart(&roster) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "no provider to connect to");
                self.signal.destroy();
                return Err(e);
            }
        };

        let peer_events = match self
            .peer
            .initialize(PeerInit::initiator(self.ice_servers.clone()))
            .await
        {
            Ok(rx) => rx,
            Err(e) => {
                self.signal.destroy();
                return Err(e);
            }
        };
        info!(%remote_peer_id, "consumer negotiating");

        let task = tokio::spawn(orchestrator.run(signal_events, peer_events));
        Ok(ConsumerSession {
            remote_peer_id,
            events,
            signal: Arc::clone(&self.signal),
            peer: Arc::clone(&self.peer),
            task,
        })
    }
}

/// A consumer that has started negotiating with a provider.
pub struct ConsumerSession {
    /// The provider bound at discovery. The orchestrator may rebind to a
    /// later sender; this is not updated.
    pub remote_peer_id: String,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
    signal: Arc<dyn RendezvousClient>,
    peer: Arc<dyn PeerConnectionProvider>,
    task: JoinHandle<()>,
}

impl ConsumerSession {
    /// Waits for the provider's stream. Peer and signal errors before it
    /// arrives are logged and waited through.
    ///
    /// # Errors
    ///
    /// [`SessionError::Stream`] if the session ends first.
    pub async fn wait_for_stream(&mut self) -> Result<MediaHandle, SessionError> {
        while let Some(event) = self.events.recv().await {
            match event {
                SessionEvent::RemoteStream(handle) => return Ok(handle),
                SessionEvent::PeerError(e) => warn!(error = %e, "peer error while waiting for stream"),
                SessionEvent::SignalError(e) => warn!(error = %e, "signal error while waiting for stream"),
                other => debug!(?other, "session event"),
            }
        }
        Err(SessionError::Stream("session closed before a stream arrived".to_string()))
    }

    /// Forwards presses from `source` to the provider until it is exhausted.
    pub async fn forward_pointer_input<S>(&self, source: &mut S) -> usize
    where
        S: PointerSource + ?Sized,
    {
        forward_pointer_input(source, self.peer.as_ref()).await
    }

    /// Stops relaying and destroys the peer connection and rendezvous session.
    pub fn shutdown(self) {
        self.task.abort();
        self.peer.destroy();
        self.signal.destroy();
        info!(remote_peer_id = %self.remote_peer_id, "consumer session shut down");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
