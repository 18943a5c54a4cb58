//! Infrastructure layer: HTTP transport and the polling rendezvous client.

pub mod signaling;
pub mod transport;

pub use signaling::SignalingClient;
pub use transport::{HttpTransport, RendezvousTransport, TransportResponse};
