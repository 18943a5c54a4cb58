//! Application layer: the rendezvous capability contract.

pub mod rendezvous;

pub use rendezvous::RendezvousClient;
