//! ReplayInputUseCase: replays data-channel input messages on the provider.
//!
//! Decodes each message with the input protocol decoder and hands the
//! resulting primitive events, in order, to an [`InputInjector`]. Real
//! injectors live outside this crate.

use std::sync::Arc;

use browserd_core::{decode_bytes, ReplayEvent};
use thiserror::Error;
use tracing::trace;

use crate::error::SessionError;

/// Error type for input injection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InjectionError {
    #[error("injection target unavailable: {0}")]
    Unavailable(String),
    #[error("platform error: {0}")]
    Platform(String),
}

/// Sink that replays one primitive input event against the local system.
pub trait InputInjector: Send + Sync {
    fn inject(&self, event: &ReplayEvent) -> Result<(), InjectionError>;
}

/// The Replay Input use case.
#[derive(Clone)]
pub struct ReplayInputUseCase {
    injector: Arc<dyn InputInjector>,
}

impl ReplayInputUseCase {
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self { injector }
    }

    /// Decodes `bytes` and injects every resulting event. Returns how many
    /// events were injected.
    ///
    /// # Errors
    ///
    /// [`SessionError::Input`] if the message is rejected by the decoder, in
    /// which case nothing is injected. [`SessionError::Injection`] on the first
    /// event the injector refuses; later events of the same message are not
    /// attempted.
    pub fn handle_bytes(&self, bytes: &[u8]) -> Result<usize, SessionError> {
        let events = decode_bytes(bytes)?;
        for event in &events {
            trace!(kind = event.type_name(), "injecting input");
            self.injector.inject(event)?;
        }
        Ok(events.len())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
