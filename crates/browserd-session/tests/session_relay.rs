//! Provider and consumer negotiating through an in-process rendezvous hub.
//!
//! The hub plays the rendezvous server: it hands out ids, returns the roster
//! at sign-in, and delivers `send` calls as peer messages on the recipient's
//! event channel. Peer connections, capture, and injection are the recording
//! mocks, so the test drives both peers' outgoing signals by hand and checks
//! what the other side received.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use browserd_core::protocol::encoder::{PointerPress, SurfaceEvent, SurfaceOrigin};
use browserd_core::protocol::messages::MouseInput;
use browserd_core::{PeerIdentity, PeerRoster, ReplayEvent};
use browserd_session::infrastructure::channel_source::ChannelPointerSource;
use browserd_session::infrastructure::mock::{
    MockInputInjector, MockPeerConnection, MockStreamProvider,
};
use browserd_session::{
    BrowserConfig, ConsumerApp, DeviceInfo, MediaHandle, PeerEvent, ProviderApp, SessionEvent,
};
use browserd_signal::{RendezvousClient, SignalError, SignalEvent};
use serde_json::json;
use tokio::sync::mpsc;

// ── Loopback rendezvous ───────────────────────────────────────────────────────

#[derive(Default)]
struct Hub {
    peers: Mutex<Vec<PeerIdentity>>,
    inboxes: Mutex<HashMap<String, mpsc::UnboundedSender<SignalEvent>>>,
}

impl Hub {
    fn client(self: &Arc<Self>, id: &str) -> (Arc<HubClient>, mpsc::UnboundedReceiver<SignalEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inboxes.lock().unwrap().insert(id.to_string(), tx);
        let client = HubClient {
            hub: Arc::clone(self),
            assigned: id.to_string(),
            id: Mutex::new(None),
        };
        (Arc::new(client), rx)
    }
}

struct HubClient {
    hub: Arc<Hub>,
    assigned: String,
    id: Mutex<Option<String>>,
}

#[async_trait]
impl RendezvousClient for HubClient {
    fn id(&self) -> Option<String> {
        self.id.lock().unwrap().clone()
    }

    async fn sign_in(&self, peer_name: &str) -> Result<PeerRoster, SignalError> {
        let mut peers = self.hub.peers.lock().unwrap();
        peers.push(PeerIdentity::new(self.assigned.as_str(), peer_name, true));
        *self.id.lock().unwrap() = Some(self.assigned.clone());
        Ok(peers.clone())
    }

    async fn send(&self, data: &str, peer_id: &str) -> Result<(), SignalError> {
        let sender_id = self.id().ok_or(SignalError::NotSignedIn)?;
        let inboxes = self.hub.inboxes.lock().unwrap();
        let inbox = inboxes
            .get(peer_id)
            .ok_or_else(|| SignalError::Protocol(format!("unknown peer {peer_id}")))?;
        let _ = inbox.send(SignalEvent::PeerMessage {
            payload: data.to_string(),
            sender_id,
        });
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), SignalError> {
        self.destroy();
        Ok(())
    }

    fn destroy(&self) {
        if let Some(id) = self.id.lock().unwrap().take() {
            self.hub.peers.lock().unwrap().retain(|p| p.id != id);
        }
    }
}

// ── Test ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_provider_and_consumer_negotiate_and_replay_input() {
    // Arrange: provider boots first so the consumer finds it on the roster
    let hub = Arc::new(Hub::default());

    let (provider_signal, provider_inbox) = hub.client("1");
    let provider_peer = Arc::new(MockPeerConnection::default());
    let injector = Arc::new(MockInputInjector::default());
    let provider = ProviderApp::new(
        BrowserConfig {
            capture_window_title: "example.com".to_string(),
            ice_servers: vec![],
        },
        provider_signal,
        Arc::new(MockStreamProvider::new(vec![DeviceInfo::new("w1", "example.com")])),
        provider_peer.clone(),
        injector.clone(),
    );
    let mut provider_session = provider.boot(provider_inbox).await.unwrap();

    let (consumer_signal, consumer_inbox) = hub.client("2");
    let consumer_peer = Arc::new(MockPeerConnection::default());
    let consumer = ConsumerApp::new(consumer_signal, consumer_peer.clone(), vec![]);
    let mut consumer_session = consumer.connect(consumer_inbox).await.unwrap();
    assert_eq!(consumer_session.remote_peer_id, "1");

    // Act + Assert: offer travels consumer -> provider
    assert!(consumer_peer.emit(PeerEvent::Signal(json!({"type": "offer", "sdp": "o"}))));
    provider_peer.wait_for_signals(1).await;
    assert_eq!(provider_peer.signals(), vec![json!({"type": "offer", "sdp": "o"})]);

    // Answer and a candidate travel provider -> consumer, the candidate
    // flattened on the wire and nested again on arrival
    let candidate = json!({"candidate": {"candidate": "c0", "sdpMLineIndex": 0, "sdpMid": "0"}});
    assert!(provider_peer.emit(PeerEvent::Signal(json!({"type": "answer", "sdp": "a"}))));
    assert!(provider_peer.emit(PeerEvent::Signal(candidate.clone())));
    consumer_peer.wait_for_signals(2).await;
    assert_eq!(
        consumer_peer.signals(),
        vec![json!({"type": "answer", "sdp": "a"}), candidate]
    );

    // Media and connection state surface on each side
    assert!(provider_peer.emit(PeerEvent::Connect));
    assert!(consumer_peer.emit(PeerEvent::Stream(MediaHandle::new("remote"))));
    assert_eq!(provider_session.events.recv().await, Some(SessionEvent::Connected));
    assert_eq!(
        consumer_session.wait_for_stream().await.unwrap(),
        MediaHandle::new("remote")
    );

    // A click on the consumer surface is replayed on the provider
    let (mut source, presses) = ChannelPointerSource::new();
    let origin = SurfaceOrigin { left: 100.0, top: 50.0 };
    presses
        .send((
            PointerPress {
                event: SurfaceEvent::MouseDown,
                client_x: 130.0,
                client_y: 90.0,
            },
            origin,
        ))
        .unwrap();
    drop(presses);
    assert_eq!(consumer_session.forward_pointer_input(&mut source).await, 1);

    for bytes in consumer_peer.sent() {
        assert!(provider_peer.emit(PeerEvent::Data(bytes)));
    }
    injector.wait_for_events(1).await;
    assert_eq!(
        injector.events(),
        vec![ReplayEvent::MouseDown(MouseInput::left_click(30.0, 40.0))]
    );

    consumer_session.shutdown();
    provider_session.shutdown();
    assert!(consumer_peer.is_destroyed());
    assert!(provider_peer.is_destroyed());
    assert!(hub.peers.lock().unwrap().is_empty());
}
