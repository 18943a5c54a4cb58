//! Polling rendezvous client.
//!
//! # Protocol
//!
//! | Operation | Request                                   | Success                          |
//! |-----------|-------------------------------------------|----------------------------------|
//! | Sign in   | `GET {base}/sign_in?peer_name={name}`     | id in `Pragma`, body = roster    |
//! | Poll      | `GET {base}/wait?peer_id={id}`            | `Pragma` = own id: roster; else relay from `Pragma` |
//! | Send      | `POST {base}/message?peer_id={id}&to={to}`| empty body                       |
//! | Sign out  | `GET {base}/sign_out?peer_id={id}`        | empty body                       |
//!
//! # Poll loop
//!
//! After sign-in a timer task ticks every `poll_interval`. Each tick spawns one
//! `wait` request unless the previous one is still outstanding, in which case
//! the tick is dropped. Every session gets a fresh epoch number; `destroy()`
//! bumps it, so requests issued before the destroy complete into nothing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use browserd_core::{parse_roster, PeerRoster};
use reqwest::Url;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::application::RendezvousClient;
use crate::domain::{SignalConfig, SignalError, SignalEvent};
use crate::infrastructure::transport::{HttpTransport, RendezvousTransport, TransportResponse};

const SIGN_IN: &str = "sign_in";
const WAIT: &str = "wait";
const MESSAGE: &str = "message";
const SIGN_OUT: &str = "sign_out";

/// Poll bookkeeping shared between the client and its spawned requests.
#[derive(Debug, Default)]
struct PollGuard {
    epoch: AtomicU64,
    in_flight: AtomicBool,
}

/// Everything one poll request needs, captured at sign-in.
#[derive(Clone)]
struct Poller {
    wait_url: Url,
    peer_id: String,
    epoch: u64,
    transport: Arc<dyn RendezvousTransport>,
    guard: Arc<PollGuard>,
    events: mpsc::UnboundedSender<SignalEvent>,
}

impl Poller {
    fn is_current(&self) -> bool {
        self.guard.epoch.load(Ordering::Acquire) == self.epoch
    }

    /// Starts a poll unless one is outstanding or the session has ended.
    fn tick(&self) -> Option<JoinHandle<()>> {
        if !self.is_current() {
            return None;
        }
        if self
            .guard
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            trace!("poll outstanding, dropping tick");
            return None;
        }

        let this = self.clone();
        Some(tokio::spawn(async move {
            let outcome = this.poll_once().await;
            this.complete(outcome);
        }))
    }

    async fn poll_once(&self) -> Result<SignalEvent, SignalError> {
        let response = self.transport.get(self.wait_url.clone()).await?;
        let sender_id = expect_peer_id(&response)?;

        if sender_id == self.peer_id {
            Ok(SignalEvent::PeerUpdate(parse_roster(&response.body)?))
        } else {
            Ok(SignalEvent::PeerMessage {
                payload: response.body,
                sender_id,
            })
        }
    }

    fn complete(&self, outcome: Result<SignalEvent, SignalError>) {
        if !self.is_current() {
            debug!(epoch = self.epoch, "discarding poll result from ended session");
            return;
        }
        self.guard.in_flight.store(false, Ordering::Release);

        let event = outcome.unwrap_or_else(|err| {
            warn!(error = %err, "poll failed");
            SignalEvent::Error(err)
        });
        if self.events.send(event).is_err() {
            trace!("signal event receiver dropped");
        }
    }

    fn spawn_timer(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if !self.is_current() {
                    break;
                }
                self.tick();
            }
        })
    }
}

struct ActiveSession {
    peer_id: String,
    #[cfg_attr(not(test), allow(dead_code))]
    poller: Poller,
    timer: JoinHandle<()>,
}

/// Rendezvous client speaking the long-poll protocol.
///
/// Created with [`SignalingClient::new`], which also returns the receiving end
/// of the notification channel.
pub struct SignalingClient {
    base: Url,
    poll_interval: Duration,
    transport: Arc<dyn RendezvousTransport>,
    guard: Arc<PollGuard>,
    session: Mutex<Option<ActiveSession>>,
    events: mpsc::UnboundedSender<SignalEvent>,
}

impl std::fmt::Debug for SignalingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalingClient")
            .field("base", &self.base.as_str())
            .field("poll_interval", &self.poll_interval)
            .field("peer_id", &self.id())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn expect_success(response: &TransportResponse) -> Result<(), SignalError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(SignalError::Protocol(format!(
            "invalid response: {}",
            response.status
        )))
    }
}

fn expect_peer_id(response: &TransportResponse) -> Result<String, SignalError> {
    expect_success(response)?;
    response
        .peer_id
        .clone()
        .ok_or_else(|| SignalError::Protocol("missing Pragma header".to_string()))
}

impl SignalingClient {
    /// Creates a signed-out client.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidUrl`] if `config.url` is not an absolute
    /// hierarchical URL.
    pub fn new(
        config: &SignalConfig,
        transport: Arc<dyn RendezvousTransport>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SignalEvent>), SignalError> {
        let base = Url::parse(&config.url)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| SignalError::InvalidUrl(config.url.clone()))?;
        let (events, rx) = mpsc::unbounded_channel();

        let client = Self {
            base,
            poll_interval: config.poll_interval(),
            transport,
            guard: Arc::new(PollGuard::default()),
            session: Mutex::new(None),
            events,
        };
        Ok((client, rx))
    }

    /// Creates a client backed by [`HttpTransport`].
    pub fn http(
        config: &SignalConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SignalEvent>), SignalError> {
        Self::new(config, Arc::new(HttpTransport::default()))
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/{path}?{pairs}`, keeping any path prefix of the base URL.
    fn endpoint(&self, path: &str, pairs: &[(&str, &str)]) -> Result<Url, SignalError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| SignalError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(path);
        url.query_pairs_mut().clear().extend_pairs(pairs);
        Ok(url)
    }

    fn require_id(&self) -> Result<String, SignalError> {
        self.id().ok_or(SignalError::NotSignedIn)
    }

    fn start_session(&self, peer_id: String) -> Result<(), SignalError> {
        let wait_url = self.endpoint(WAIT, &[("peer_id", peer_id.as_str())])?;
        let epoch = self.guard.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        self.guard.in_flight.store(false, Ordering::Release);

        let poller = Poller {
            wait_url,
            peer_id: peer_id.clone(),
            epoch,
            transport: Arc::clone(&self.transport),
            guard: Arc::clone(&self.guard),
            events: self.events.clone(),
        };
        let timer = poller.clone().spawn_timer(self.poll_interval);

        *lock(&self.session) = Some(ActiveSession {
            peer_id,
            poller,
            timer,
        });
        Ok(())
    }

    /// Fires one poll tick by hand, as the timer would.
    #[cfg(test)]
    fn poll_now(&self) -> Option<JoinHandle<()>> {
        lock(&self.session).as_ref().and_then(|s| s.poller.tick())
    }
}

#[async_trait]
impl RendezvousClient for SignalingClient {
    fn id(&self) -> Option<String> {
        lock(&self.session).as_ref().map(|s| s.peer_id.clone())
    }

    async fn sign_in(&self, peer_name: &str) -> Result<PeerRoster, SignalError> {
        if self.id().is_some() {
            debug!("sign_in while signed in, ending previous session");
            self.destroy();
        }

        let url = self.endpoint(SIGN_IN, &[("peer_name", peer_name)])?;
        let response = self.transport.get(url).await?;
        let peer_id = expect_peer_id(&response)?;
        let roster = parse_roster(&response.body)?;

        self.start_session(peer_id.clone())?;
        info!(%peer_id, peer_name, peers = roster.len(), "signed in to rendezvous server");
        Ok(roster)
    }

    async fn send(&self, data: &str, peer_id: &str) -> Result<(), SignalError> {
        let own_id = self.require_id()?;
        let url = self.endpoint(MESSAGE, &[("peer_id", own_id.as_str()), ("to", peer_id)])?;
        let response = self.transport.post(url, data.to_string()).await?;
        expect_success(&response)?;
        trace!(to = peer_id, len = data.len(), "relayed message");
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), SignalError> {
        let own_id = self.require_id()?;
        let url = self.endpoint(SIGN_OUT, &[("peer_id", own_id.as_str())])?;
        let response = self.transport.get(url).await?;
        expect_success(&response)?;
        info!(peer_id = %own_id, "signed out of rendezvous server");
        self.destroy();
        Ok(())
    }

    fn destroy(&self) {
        self.guard.epoch.fetch_add(1, Ordering::AcqRel);
        self.guard.in_flight.store(false, Ordering::Release);
        if let Some(session) = lock(&self.session).take() {
            session.timer.abort();
            debug!(peer_id = %session.peer_id, "signaling session destroyed");
        }
    }
}

impl Drop for SignalingClient {
    fn drop(&mut self) {
        self.destroy();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
