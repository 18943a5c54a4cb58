//! Recording collaborators for unit tests and local demos.
//!
//! None of these touch the network, the screen, or the OS input queue. Every
//! call is pushed into a `Mutex<Vec<...>>` so assertions can inspect exactly
//! what happened and in what order. Each mock has a failure switch for
//! exercising error paths.
//!
//! Session tasks run on their own, so the `wait_for_*` helpers poll until the
//! expected number of records has landed (or a generous deadline passes, in
//! which case the caller's assertion reports the shortfall).
//!
//! ```ignore
//! let peer = Arc::new(MockPeerConnection::default());
//! let (orchestrator, _events) = NegotiationOrchestrator::new(signal, peer.clone());
//! // ...
//! peer.emit(PeerEvent::Connect);
//! assert_eq!(peer.signals().len(), 1);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use browserd_core::{PeerIdentity, PeerRoster, ReplayEvent};
use browserd_signal::{RendezvousClient, SignalError};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::application::negotiation::{PeerConnectionProvider, PeerInit};
use crate::application::provider_app::{DeviceInfo, StreamProvider};
use crate::application::replay_input::{InjectionError, InputInjector};
use crate::domain::events::{MediaHandle, PeerEvent};
use crate::error::SessionError;

async fn wait_until(done: impl Fn() -> bool) {
    for _ in 0..500 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

// ── Input injection ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockInputInjector {
    /// Every event passed to `inject`, in order.
    pub injected: Mutex<Vec<ReplayEvent>>,
    /// When true, `inject` returns an error and records nothing.
    pub should_fail: bool,
}

impl MockInputInjector {
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<ReplayEvent> {
        self.injected.lock().unwrap().clone()
    }

    pub async fn wait_for_events(&self, count: usize) {
        wait_until(|| self.injected.lock().unwrap().len() >= count).await;
    }
}

impl InputInjector for MockInputInjector {
    fn inject(&self, event: &ReplayEvent) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".into()));
        }
        self.injected.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ── Media ─────────────────────────────────────────────────────────────────────

/// Offers a fixed device list. Streams are named `stream:{device id}`.
#[derive(Default)]
pub struct MockStreamProvider {
    pub devices: Vec<DeviceInfo>,
    /// Devices passed to `create_stream`, in order.
    pub created: Mutex<Vec<DeviceInfo>>,
    pub should_fail: bool,
}

impl MockStreamProvider {
    pub fn new(devices: Vec<DeviceInfo>) -> Self {
        Self {
            devices,
            ..Self::default()
        }
    }

    pub fn created(&self) -> Vec<DeviceInfo> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamProvider for MockStreamProvider {
    async fn enumerate_devices(&self) -> Result<Vec<DeviceInfo>, SessionError> {
        Ok(self.devices.clone())
    }

    async fn create_stream(&self, device: &DeviceInfo) -> Result<MediaHandle, SessionError> {
        if self.should_fail {
            return Err(SessionError::Stream("mock failure".into()));
        }
        self.created.lock().unwrap().push(device.clone());
        Ok(MediaHandle::new(format!("stream:{}", device.id)))
    }
}

// ── Peer connection ───────────────────────────────────────────────────────────

/// Records everything fed to it. Events are pushed in with [`emit`] once
/// `initialize` has handed out the receiving end.
///
/// [`emit`]: MockPeerConnection::emit
#[derive(Default)]
pub struct MockPeerConnection {
    pub inits: Mutex<Vec<PeerInit>>,
    /// Remote payloads passed to `signal`.
    pub signals: Mutex<Vec<Value>>,
    /// Data-channel messages passed to `send`.
    pub sent: Mutex<Vec<Vec<u8>>>,
    events: Mutex<Option<mpsc::UnboundedSender<PeerEvent>>>,
    destroyed: AtomicBool,
    fail_sends: AtomicBool,
}

impl MockPeerConnection {
    pub fn inits(&self) -> Vec<PeerInit> {
        self.inits.lock().unwrap().clone()
    }

    pub fn signals(&self) -> Vec<Value> {
        self.signals.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Delivers `event` as if the connection raised it. Returns false when
    /// there is no live receiver (not initialized, destroyed, or dropped).
    pub fn emit(&self, event: PeerEvent) -> bool {
        match self.events.lock().unwrap().as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    pub async fn wait_for_signals(&self, count: usize) {
        wait_until(|| self.signals.lock().unwrap().len() >= count).await;
    }

    pub async fn wait_for_sent(&self, count: usize) {
        wait_until(|| self.sent.lock().unwrap().len() >= count).await;
    }
}

#[async_trait]
impl PeerConnectionProvider for MockPeerConnection {
    async fn initialize(
        &self,
        init: PeerInit,
    ) -> Result<mpsc::UnboundedReceiver<PeerEvent>, SessionError> {
        let mut inits = self.inits.lock().unwrap();
        if !inits.is_empty() {
            return Err(SessionError::Peer("already initialized".into()));
        }
        inits.push(init);
        let (tx, rx) = mpsc::unbounded_channel();
        *self.events.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn signal(&self, data: Value) -> Result<(), SessionError> {
        self.signals.lock().unwrap().push(data);
        Ok(())
    }

    async fn send(&self, data: &[u8]) -> Result<(), SessionError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(SessionError::Peer("mock failure".into()));
        }
        self.sent.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        self.events.lock().unwrap().take();
    }
}

// ── Rendezvous ────────────────────────────────────────────────────────────────

/// Stands in for a signed-in rendezvous session. Emits no events; tests feed
/// the orchestrator's signal channel directly.
#[derive(Default)]
pub struct MockRendezvousClient {
    id: Mutex<Option<String>>,
    /// Id adopted on `sign_in`.
    assigned_id: Option<String>,
    /// Roster returned from `sign_in`.
    roster: PeerRoster,
    /// Names passed to `sign_in`, in order.
    pub sign_ins: Mutex<Vec<String>>,
    /// `(data, peer_id)` pairs passed to `send`.
    pub sends: Mutex<Vec<(String, String)>>,
    fail_sign_in: AtomicBool,
    fail_sends: AtomicBool,
}

impl MockRendezvousClient {
    /// Already signed in as `id` (or signed out when `None`).
    pub fn with_id(id: Option<&str>) -> Self {
        let id = id.map(str::to_string);
        Self {
            id: Mutex::new(id.clone()),
            assigned_id: id,
            ..Self::default()
        }
    }

    /// Signed out; `sign_in` assigns `id` and returns `roster`.
    pub fn signing_in_as(id: &str, roster: Vec<PeerIdentity>) -> Self {
        Self {
            assigned_id: Some(id.to_string()),
            roster,
            ..Self::default()
        }
    }

    pub fn signed_in_as(&self) -> Vec<String> {
        self.sign_ins.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sends.lock().unwrap().clone()
    }

    pub fn fail_sign_in(&self, fail: bool) {
        self.fail_sign_in.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub async fn wait_for_sends(&self, count: usize) {
        wait_until(|| self.sends.lock().unwrap().len() >= count).await;
    }
}

#[async_trait]
impl RendezvousClient for MockRendezvousClient {
    fn id(&self) -> Option<String> {
        self.id.lock().unwrap().clone()
    }

    async fn sign_in(&self, name: &str) -> Result<PeerRoster, SignalError> {
        if self.fail_sign_in.load(Ordering::SeqCst) {
            return Err(SignalError::Network("mock failure".into()));
        }
        self.sign_ins.lock().unwrap().push(name.to_string());
        *self.id.lock().unwrap() = self.assigned_id.clone();
        Ok(self.roster.clone())
    }

    async fn send(&self, data: &str, peer_id: &str) -> Result<(), SignalError> {
        if self.id().is_none() {
            return Err(SignalError::NotSignedIn);
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(SignalError::Network("mock failure".into()));
        }
        self.sends
            .lock()
            .unwrap()
            .push((data.to_string(), peer_id.to_string()));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), SignalError> {
        if self.id.lock().unwrap().take().is_none() {
            return Err(SignalError::NotSignedIn);
        }
        Ok(())
    }

    fn destroy(&self) {
        self.id.lock().unwrap().take();
    }
}
