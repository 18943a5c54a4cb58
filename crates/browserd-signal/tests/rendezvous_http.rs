//! Integration tests for the browserd-signal client over real HTTP.
//!
//! A rendezvous server built on an axum `Router` runs on a loopback socket so
//! the reqwest transport, the `Pragma` header handling, and the poll loop are
//! exercised together through the public API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use browserd_core::PeerIdentity;
use browserd_signal::{
    HttpTransport, RendezvousClient, RendezvousTransport, SignalConfig, SignalError, SignalEvent,
    SignalingClient,
};
use tokio::net::TcpListener;

// ── Loopback rendezvous server ────────────────────────────────────────────────

/// Serves a single peer `alice` (id 1) whose counterpart `bob` (id 2) relays
/// one offer on the first poll.
#[derive(Default)]
struct Rendezvous {
    /// `("{method} {path?query}", body)` for every request, in order.
    log: Mutex<Vec<(String, String)>>,
    relayed: AtomicBool,
}

type Params = Query<HashMap<String, String>>;

impl Rendezvous {
    fn record(&self, method: &Method, uri: &Uri, body: &str) {
        self.log
            .lock()
            .unwrap()
            .push((format!("{method} {uri}"), body.to_string()));
    }

    fn lines(&self) -> Vec<(String, String)> {
        self.log.lock().unwrap().clone()
    }
}

fn is_alice(params: &HashMap<String, String>) -> bool {
    params.get("peer_id").map(String::as_str) == Some("1")
}

fn with_pragma(id: &'static str, body: &'static str) -> Response {
    ([(header::PRAGMA, id)], body).into_response()
}

async fn sign_in(
    State(state): State<Arc<Rendezvous>>,
    method: Method,
    uri: Uri,
    Query(params): Params,
) -> Response {
    state.record(&method, &uri, "");
    match params.get("peer_name").map(String::as_str) {
        Some("alice") => with_pragma("1", "alice,1,1\nbob,2,1\n"),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn wait(
    State(state): State<Arc<Rendezvous>>,
    method: Method,
    uri: Uri,
    Query(params): Params,
) -> Response {
    state.record(&method, &uri, "");
    if !is_alice(&params) {
        return StatusCode::NOT_FOUND.into_response();
    }
    if state.relayed.swap(true, Ordering::SeqCst) {
        with_pragma("1", "alice,1,1\n")
    } else {
        with_pragma("2", r#"{"type":"offer","sdp":"v=0"}"#)
    }
}

async fn message(
    State(state): State<Arc<Rendezvous>>,
    method: Method,
    uri: Uri,
    Query(params): Params,
    body: String,
) -> StatusCode {
    state.record(&method, &uri, &body);
    if is_alice(&params) && params.get("to").map(String::as_str) == Some("2") {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn sign_out(
    State(state): State<Arc<Rendezvous>>,
    method: Method,
    uri: Uri,
    Query(params): Params,
) -> StatusCode {
    state.record(&method, &uri, "");
    if is_alice(&params) {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn spawn_server() -> (String, Arc<Rendezvous>) {
    let state = Arc::new(Rendezvous::default());
    let app = Router::new()
        .route("/sign_in", get(sign_in))
        .route("/wait", get(wait))
        .route("/message", post(message))
        .route("/sign_out", get(sign_out))
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_session_over_http() {
    // Arrange
    let (url, server) = spawn_server().await;
    let config = SignalConfig::new(url, 20);
    let (client, mut events) = SignalingClient::http(&config).unwrap();

    // Act: sign in
    let roster = client.sign_in("alice").await.unwrap();

    // Assert: roster and id come from body and Pragma header
    assert_eq!(client.id().as_deref(), Some("1"));
    assert_eq!(
        roster,
        vec![PeerIdentity::new("1", "alice", true), PeerIdentity::new("2", "bob", true)]
    );

    // The first poll carries bob's relayed offer, the next a roster update.
    let first = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap();
    assert_eq!(
        first,
        Some(SignalEvent::PeerMessage {
            payload: r#"{"type":"offer","sdp":"v=0"}"#.to_string(),
            sender_id: "2".to_string(),
        })
    );
    let second = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap();
    assert_eq!(
        second,
        Some(SignalEvent::PeerUpdate(vec![PeerIdentity::new("1", "alice", true)]))
    );

    // Relay an answer and sign out.
    client.send(r#"{"type":"answer"}"#, "2").await.unwrap();
    client.sign_out().await.unwrap();
    assert_eq!(client.id(), None);

    let log = server.lines();
    let posted = log
        .iter()
        .find(|(line, _)| line.starts_with("POST /message?peer_id=1&to=2"))
        .expect("message was posted");
    assert_eq!(posted.1, r#"{"type":"answer"}"#);
    assert!(log
        .iter()
        .any(|(line, _)| line.starts_with("GET /sign_out?peer_id=1")));
}

#[tokio::test]
async fn test_unknown_peer_name_is_rejected_with_status() {
    let (url, _server) = spawn_server().await;
    let (client, _events) = SignalingClient::http(&SignalConfig::new(url, 1000)).unwrap();

    let result = client.sign_in("mallory").await;

    assert_eq!(
        result,
        Err(SignalError::Protocol("invalid response: 404".to_string()))
    );
}

#[tokio::test]
async fn test_transport_reads_pragma_header() {
    let (url, _server) = spawn_server().await;
    let transport = HttpTransport::default();

    let response = transport
        .get(format!("{url}/sign_in?peer_name=alice").parse().unwrap())
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.peer_id.as_deref(), Some("1"));
    assert_eq!(response.body, "alice,1,1\nbob,2,1\n");
}
