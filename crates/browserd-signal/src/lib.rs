//! browserd-signal library crate.
//!
//! Client side of the HTTP long-poll rendezvous protocol. Two browserd peers
//! use it to find each other and to relay connection-setup messages until a
//! direct media session exists.
//!
//! # Architecture
//!
//! ```text
//! [browserd-signal]
//!   ├── domain/           SignalConfig, SignalEvent, SignalError
//!   ├── application/      RendezvousClient capability trait
//!   └── infrastructure/
//!         ├── transport/  RendezvousTransport trait + reqwest implementation
//!         └── signaling/  SignalingClient: sign-in, poll loop, relay
//! ```
//!
//! Notifications (roster updates, relayed messages, poll errors) are delivered
//! on a typed `mpsc` channel returned from [`SignalingClient::new`]; the
//! capability trait carries only the request/response operations.

/// Domain layer: configuration, events, and errors (no I/O).
pub mod domain;

/// Application layer: the rendezvous capability contract.
pub mod application;

/// Infrastructure layer: HTTP transport and the polling client.
pub mod infrastructure;

pub use application::RendezvousClient;
pub use domain::{SignalConfig, SignalError, SignalEvent};
pub use infrastructure::{HttpTransport, RendezvousTransport, SignalingClient, TransportResponse};
