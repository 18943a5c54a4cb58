//! Provider role: captures a window and serves it to one consumer.
//!
//! Boot sequence:
//! 1. enumerate capture devices and pick the one named after the capture
//!    window title, else the first;
//! 2. create a stream from it;
//! 3. initialize the peer connection as responder with that stream and the
//!    H264 prioritizer as session-description transform;
//! 4. sign in as `{capture_window_title}.{uuid}`;
//! 5. run the negotiation orchestrator with input replay attached.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use browserd_core::{CodecPrioritizer, SdpTransform};
use browserd_signal::{RendezvousClient, SignalEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::negotiation::{NegotiationOrchestrator, PeerConnectionProvider, PeerInit};
use crate::application::replay_input::{InputInjector, ReplayInputUseCase};
use crate::domain::config::BrowserConfig;
use crate::domain::events::{MediaHandle, SessionEvent};
use crate::error::SessionError;

/// A capturable source (screen or window).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
}

impl DeviceInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Source of local media streams.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    async fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, SessionError>;

    async fn create_stream(&self, device: &DeviceInfo) -> Result<MediaHandle, SessionError>;
}

/// The device named `title`, else the first one.
pub fn select_capture_device<'a>(devices: &'a [DeviceInfo], title: &str) -> Option<&'a DeviceInfo> {
    devices.iter().find(|d| d.name == title).or_else(|| devices.first())
}

/// A booted session. Dropping it leaves the session running; call
/// [`RunningSession::shutdown`] to stop it.
pub struct RunningSession {
    /// Id assigned by the rendezvous server.
    pub peer_id: String,
    /// Name this side signed in under.
    pub peer_name: String,
    /// Device being captured.
    pub device: DeviceInfo,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
    signal: Arc<dyn RendezvousClient>,
    peer: Arc<dyn PeerConnectionProvider>,
    task: JoinHandle<()>,
}

impl RunningSession {
    /// Stops relaying and destroys the peer connection and rendezvous session.
    pub fn shutdown(self) {
        self.task.abort();
        self.peer.destroy();
        self.signal.destroy();
        info!(peer_id = %self.peer_id, "provider session shut down");
    }

    /// Waits until the relay loop exits on its own.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(error = %e, "provider relay task failed");
        }
    }
}

/// Capture-side application. Boots at most once.
pub struct ProviderApp {
    config: BrowserConfig,
    signal: Arc<dyn RendezvousClient>,
    streams: Arc<dyn StreamProvider>,
    peer: Arc<dyn PeerConnectionProvider>,
    injector: Arc<dyn InputInjector>,
    sdp_transform: Arc<dyn SdpTransform>,
    booted: AtomicBool,
}

impl ProviderApp {
    pub fn new(
        config: BrowserConfig,
        signal: Arc<dyn RendezvousClient>,
        streams: Arc<dyn StreamProvider>,
        peer: Arc<dyn PeerConnectionProvider>,
        injector: Arc<dyn InputInjector>,
    ) -> Self {
        Self {
            config,
            signal,
            streams,
            peer,
            injector,
            sdp_transform: Arc::new(CodecPrioritizer::default()),
            booted: AtomicBool::new(false),
        }
    }

    /// Replaces the default H264 prioritizer.
    pub fn with_sdp_transform(mut self, transform: Arc<dyn SdpTransform>) -> Self {
        self.sdp_transform = transform;
        self
    }

    /// Runs the boot sequence. `signal_events` is the receiver paired with the
    /// rendezvous client passed to [`ProviderApp::new`].
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyBooted`] on any call after the first, even if
    /// the first failed. [`SessionError::NoDevices`] when there is nothing to
    /// capture. Stream, peer, and sign-in failures propagate unchanged.
    pub async fn boot(
        &self,
        signal_events: mpsc::UnboundedReceiver<SignalEvent>,
    ) -> Result<RunningSession, SessionError> {
        if self
            .booted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::AlreadyBooted);
        }
        info!("initializing provider");

        let devices = self.streams.enumerate_devices().await?;
        let title = self.config.capture_window_title.as_str();
        let device = select_capture_device(&devices, title)
            .cloned()
            .ok_or(SessionError::NoDevices)?;
        if device.name == title {
            info!(device = %device.name, "found device matching capture window");
        } else {
            info!(device = %device.name, wanted = title, "no matching device, selecting first");
        }

        let stream = self.streams.create_stream(&device).await?;
        let peer_events = self
            .peer
            .initialize(PeerInit::responder(
                self.config.ice_servers.clone(),
                stream,
                Arc::clone(&self.sdp_transform),
            ))
            .await?;

        let peer_name = format!("{title}.{}", Uuid::new_v4());
        if let Err(e) = self.signal.sign_in(&peer_name).await {
            self.peer.destroy();
            return Err(e.into());
        }
        let peer_id = self.signal.id().unwrap_or_default();
        info!(%peer_id, %peer_name, "provider booted");

        let (orchestrator, events) =
            NegotiationOrchestrator::new(Arc::clone(&self.signal), Arc::clone(&self.peer));
        let orchestrator =
            orchestrator.with_replay(ReplayInputUseCase::new(Arc::clone(&self.injector)));
        let task = tokio::spawn(orchestrator.run(signal_events, peer_events));

        Ok(RunningSession {
            peer_id,
            peer_name,
            device,
            events,
            signal: Arc::clone(&self.signal),
            peer: Arc::clone(&self.peer),
            task,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
