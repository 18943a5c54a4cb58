//! Domain entities for browserd.
//!
//! Pure data and rules shared by the signaling and session crates. Nothing
//! here performs I/O: the rendezvous client feeds roster text in, the
//! negotiation layer feeds signaling payloads in, and both get plain values
//! back.

/// Peer roster parsing and counterpart discovery.
pub mod roster;

/// One-level candidate envelope rewriting at the rendezvous boundary.
pub mod envelope;
