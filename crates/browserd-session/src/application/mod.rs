pub mod consumer_app;
pub mod negotiation;
pub mod provider_app;
pub mod replay_input;
