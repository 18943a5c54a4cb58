//! HTTP transport for the rendezvous protocol.
//!
//! The server hands out peer ids in the `Pragma` response header; everything
//! else travels in plain-text bodies. [`RendezvousTransport`] narrows HTTP down
//! to the two verbs the protocol needs, so the polling logic can be tested
//! against in-memory servers.

use async_trait::async_trait;
use reqwest::header::PRAGMA;
use reqwest::{Client, Url};
use tracing::trace;

use crate::domain::SignalError;

/// The parts of an HTTP response the rendezvous protocol looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Value of the `Pragma` header, if present.
    pub peer_id: Option<String>,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(peer_id: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status: 200,
            peer_id: peer_id.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            peer_id: None,
            body: String::new(),
        }
    }

    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait RendezvousTransport: Send + Sync {
    async fn get(&self, url: Url) -> Result<TransportResponse, SignalError>;

    async fn post(&self, url: Url, body: String) -> Result<TransportResponse, SignalError>;
}

/// [`RendezvousTransport`] over `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn read(response: reqwest::Response) -> Result<TransportResponse, SignalError> {
        let status = response.status().as_u16();
        let peer_id = response
            .headers()
            .get(PRAGMA)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| SignalError::Network(e.to_string()))?;
        trace!(status, ?peer_id, len = body.len(), "rendezvous response");
        Ok(TransportResponse {
            status,
            peer_id,
            body,
        })
    }
}

#[async_trait]
impl RendezvousTransport for HttpTransport {
    async fn get(&self, url: Url) -> Result<TransportResponse, SignalError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SignalError::Network(e.to_string()))?;
        Self::read(response).await
    }

    async fn post(&self, url: Url, body: String) -> Result<TransportResponse, SignalError> {
        let response = self
            .client
            .post(url)
            .body(body)
            .send()
            .await
            .map_err(|e| SignalError::Network(e.to_string()))?;
        Self::read(response).await
    }
}
