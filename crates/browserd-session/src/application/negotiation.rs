//! NegotiationOrchestrator: relays signaling between the rendezvous client and
//! the peer-connection provider for exactly one remote counterpart.
//!
//! # Flow
//!
//! ```text
//!  rendezvous ──PeerMessage──▶ bind sender ─▶ wrap candidate ─▶ provider.signal
//!  provider ───Signal────────▶ unwrap candidate ─▶ rendezvous.send(counterpart)
//!  provider ───Data──────────▶ decode ─▶ InputInjector
//!  provider ───Connect/Disconnect/Error/Stream──▶ SessionEvent
//! ```
//!
//! The counterpart is set by discovery and then overwritten by the sender id
//! of every relayed message. Failures in the middle of a session are logged
//! and the session carries on.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use browserd_core::{
    find_counterpart, unwrap_outbound_candidate, wrap_inbound_candidate, PeerIdentity,
    SdpTransform,
};
use browserd_signal::{RendezvousClient, SignalError, SignalEvent};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::application::replay_input::ReplayInputUseCase;
use crate::domain::config::IceServer;
use crate::domain::events::{MediaHandle, PeerEvent, PeerRole, SessionEvent};
use crate::error::SessionError;

/// Arguments for [`PeerConnectionProvider::initialize`].
#[derive(Clone)]
pub struct PeerInit {
    pub role: PeerRole,
    pub ice_servers: Vec<IceServer>,
    /// Local media to send. `None` for a receive-only peer.
    pub stream: Option<MediaHandle>,
    /// Applied to every local session description before it is used.
    pub sdp_transform: Option<Arc<dyn SdpTransform>>,
}

impl PeerInit {
    pub fn initiator(ice_servers: Vec<IceServer>) -> Self {
        Self {
            role: PeerRole::Initiator,
            ice_servers,
            stream: None,
            sdp_transform: None,
        }
    }

    pub fn responder(
        ice_servers: Vec<IceServer>,
        stream: MediaHandle,
        sdp_transform: Arc<dyn SdpTransform>,
    ) -> Self {
        Self {
            role: PeerRole::Responder,
            ice_servers,
            stream: Some(stream),
            sdp_transform: Some(sdp_transform),
        }
    }
}

impl fmt::Debug for PeerInit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerInit")
            .field("role", &self.role)
            .field("ice_servers", &self.ice_servers)
            .field("stream", &self.stream)
            .field("sdp_transform", &self.sdp_transform.is_some())
            .finish()
    }
}

/// A WebRTC-style peer connection owned by an external stack.
#[async_trait]
pub trait PeerConnectionProvider: Send + Sync {
    /// Creates the connection. Events arrive on the returned channel until the
    /// connection is destroyed.
    ///
    /// # Errors
    ///
    /// [`SessionError::Peer`] if the provider is already initialized or the
    /// stack refuses the configuration.
    async fn initialize(
        &self,
        init: PeerInit,
    ) -> Result<mpsc::UnboundedReceiver<PeerEvent>, SessionError>;

    /// Feeds a remote signaling payload (offer, answer, nested candidate).
    async fn signal(&self, data: Value) -> Result<(), SessionError>;

    /// Sends bytes over the data channel.
    async fn send(&self, data: &[u8]) -> Result<(), SessionError>;

    fn destroy(&self);
}

/// Relays signaling for one counterpart.
pub struct NegotiationOrchestrator {
    signal: Arc<dyn RendezvousClient>,
    peer: Arc<dyn PeerConnectionProvider>,
    replay: Option<ReplayInputUseCase>,
    remote_peer_id: Option<String>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl NegotiationOrchestrator {
    /// Creates an orchestrator with no counterpart bound. Session events are
    /// delivered on the returned receiver.
    pub fn new(
        signal: Arc<dyn RendezvousClient>,
        peer: Arc<dyn PeerConnectionProvider>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let orchestrator = Self {
            signal,
            peer,
            replay: None,
            remote_peer_id: None,
            events,
        };
        (orchestrator, rx)
    }

    /// Routes data-channel messages into `replay`. Without it they are
    /// logged and dropped.
    pub fn with_replay(mut self, replay: ReplayInputUseCase) -> Self {
        self.replay = Some(replay);
        self
    }

    pub fn remote_peer_id(&self) -> Option<&str> {
        self.remote_peer_id.as_deref()
    }

    pub fn bind_counterpart(&mut self, peer_id: impl Into<String>) {
        let peer_id = peer_id.into();
        if self.remote_peer_id.as_deref() != Some(peer_id.as_str()) {
            debug!(%peer_id, "bound counterpart");
        }
        self.remote_peer_id = Some(peer_id);
    }

    /// Binds the first roster entry that is not ourselves.
    ///
    /// # Errors
    ///
    /// [`SessionError::Signal`] with [`SignalError::NotSignedIn`] when the
    /// rendezvous client has no id, [`SessionError::NotFound`] when the roster
    /// holds nobody else.
    pub fn discover_counterpart(&mut self, roster: &[PeerIdentity]) -> Result<String, SessionError> {
        let own_id = self.signal.id().ok_or(SignalError::NotSignedIn)?;
        let counterpart = find_counterpart(roster, &own_id).ok_or(SessionError::NotFound)?;
        info!(peer_id = %counterpart.id, name = %counterpart.name, "discovered counterpart");
        let id = counterpart.id.clone();
        self.bind_counterpart(id.clone());
        Ok(id)
    }

    /// Handles one notification from the rendezvous client.
    pub async fn handle_signal_event(&mut self, event: SignalEvent) {
        match event {
            SignalEvent::PeerUpdate(roster) => {
                debug!(peers = roster.len(), "roster updated");
            }
            SignalEvent::PeerMessage { payload, sender_id } => {
                self.bind_counterpart(sender_id);
                if let Err(e) = self.relay_inbound(&payload).await {
                    warn!(error = %e, "failed to relay inbound signal");
                }
            }
            SignalEvent::Error(e) => {
                error!(error = %e, "signal error");
                self.emit(SessionEvent::SignalError(e));
            }
        }
    }

    async fn relay_inbound(&self, payload: &str) -> Result<(), SessionError> {
        let parsed: Value = serde_json::from_str(payload)?;
        self.peer.signal(wrap_inbound_candidate(parsed)).await
    }

    /// Handles one notification from the peer-connection provider.
    pub async fn handle_peer_event(&mut self, event: PeerEvent) {
        match event {
            PeerEvent::Error(message) => {
                error!(error = %message, "peer connection error");
                self.emit(SessionEvent::PeerError(message));
            }
            PeerEvent::Connect => {
                info!("peer connected");
                self.emit(SessionEvent::Connected);
            }
            PeerEvent::Disconnect => {
                info!("peer disconnected");
                self.emit(SessionEvent::Disconnected);
            }
            PeerEvent::Signal(data) => {
                if let Err(e) = self.relay_outbound(data).await {
                    warn!(error = %e, "failed to relay outbound signal");
                }
            }
            PeerEvent::Data(bytes) => match &self.replay {
                Some(replay) => {
                    if let Err(e) = replay.handle_bytes(&bytes) {
                        warn!(error = %e, "failed to replay input message");
                    }
                }
                None => debug!(len = bytes.len(), "data message with no replay sink"),
            },
            PeerEvent::Stream(handle) => {
                info!(stream = handle.id(), "remote stream arrived");
                self.emit(SessionEvent::RemoteStream(handle));
            }
        }
    }

    async fn relay_outbound(&self, data: Value) -> Result<(), SessionError> {
        let Some(remote) = self.remote_peer_id.as_deref() else {
            warn!("no counterpart bound, dropping outbound signal");
            return Ok(());
        };
        let body = serde_json::to_string(&unwrap_outbound_candidate(data))?;
        self.signal.send(&body, remote).await?;
        Ok(())
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!("session event receiver dropped");
        }
    }

    /// Pumps both event streams until both are closed, then tears the session
    /// down.
    pub async fn run(
        mut self,
        mut signal_events: mpsc::UnboundedReceiver<SignalEvent>,
        mut peer_events: mpsc::UnboundedReceiver<PeerEvent>,
    ) {
        loop {
            tokio::select! {
                Some(event) = signal_events.recv() => self.handle_signal_event(event).await,
                Some(event) = peer_events.recv() => self.handle_peer_event(event).await,
                else => break,
            }
        }
        info!("negotiation event streams closed");
        self.close();
    }

    /// Destroys the peer connection and the rendezvous session.
    pub fn close(&self) {
        self.peer.destroy();
        self.signal.destroy();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
