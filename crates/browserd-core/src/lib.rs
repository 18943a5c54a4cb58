//! # browserd-core
//!
//! Shared library for browserd containing the input wire protocol, the
//! session-description codec prioritizer, key classification tables, and the
//! peer roster / signaling envelope types.
//!
//! This crate is used by both the capture ("provider") side and the playback
//! ("consumer") side.  It performs no I/O: no sockets, no timers, no OS APIs.
//!
//! # Architecture overview
//!
//! browserd streams a captured window from a provider to a consumer over a
//! peer-to-peer media session.  Before the session exists, both ends exchange
//! setup messages through an HTTP rendezvous server.  Once connected, the
//! consumer forwards its pointer and keyboard input back to the provider over
//! the session's data channel.
//!
//! - **`protocol`** – The versioned JSON input protocol.  The encoder turns
//!   local pointer presses into wire messages; the decoder turns wire messages
//!   into primitive events that an injection sink can replay.
//!
//! - **`keymap`** – Classification of wire key names (printable characters,
//!   modifiers, named special keys) used by the decoder.
//!
//! - **`sdp`** – A pure session-description transform that moves the
//!   preferred video codec (H264) to the front of every video section.
//!
//! - **`domain`** – Peer roster parsing, counterpart discovery, and the
//!   candidate envelope rewrite applied at the rendezvous boundary.

pub mod domain;
pub mod keymap;
pub mod protocol;
pub mod sdp;

pub use domain::envelope::{unwrap_outbound_candidate, wrap_inbound_candidate};
pub use domain::roster::{
    find_counterpart, parse_roster, serialize_roster, PeerIdentity, PeerRoster, RosterError,
};
pub use protocol::decoder::{decode_bytes, decode_message, InputProtocolError};
pub use protocol::encoder::{encode_key, encode_pointer, to_wire_bytes};
pub use protocol::messages::{ReplayEvent, WireMessage};
pub use sdp::{CodecPrioritizer, SdpError, SdpTransform};
