//! browserd-session library crate.
//!
//! Ties the rendezvous client, an external peer-connection provider, and the
//! input protocol together into a streaming session.
//!
//! # Architecture
//!
//! ```text
//! [browserd-session]
//!   ├── domain/           BootConfig handoff, session and peer events
//!   ├── application/
//!   │     ├── negotiation     NegotiationOrchestrator + PeerConnectionProvider
//!   │     ├── replay_input    wire bytes -> InputInjector
//!   │     ├── provider_app    capture side: device pick, responder, sign-in
//!   │     └── consumer_app    playback side: discovery, initiator, input forwarding
//!   └── infrastructure/   in-memory collaborators (peer, injector, streams,
//!                         rendezvous, pointer source)
//! ```
//!
//! The collaborator traits live next to the use case that consumes them.
//! Real implementations (a WebRTC stack, an OS input injector, a screen
//! capturer) plug in from outside this crate.

pub mod error;

/// Domain layer: configuration handoff and event types (no I/O).
pub mod domain;

/// Application layer: negotiation and the two session roles.
pub mod application;

/// Infrastructure layer: in-memory collaborator implementations.
pub mod infrastructure;

pub use application::consumer_app::{ConsumerApp, ConsumerSession, PointerSource};
pub use application::negotiation::{NegotiationOrchestrator, PeerConnectionProvider, PeerInit};
pub use application::provider_app::{DeviceInfo, ProviderApp, RunningSession, StreamProvider};
pub use application::replay_input::{InjectionError, InputInjector, ReplayInputUseCase};
pub use domain::config::{BootConfig, BrowserConfig, ConfigError, IceServer};
pub use domain::events::{MediaHandle, PeerEvent, PeerRole, SessionEvent};
pub use error::SessionError;
