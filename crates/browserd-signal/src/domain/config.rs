//! Rendezvous client configuration.
//!
//! [`SignalConfig`] is a plain value: the CLI fills it from arguments and
//! environment variables, and the session crate embeds it in the boot
//! handoff message passed to the capture side.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default rendezvous server address for local development.
pub const DEFAULT_SIGNAL_URL: &str = "http://localhost:3000";

/// Default delay between long-poll ticks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Settings for one [`crate::SignalingClient`].
///
/// # Example
///
/// ```rust
/// use browserd_signal::SignalConfig;
///
/// let cfg = SignalConfig::default();
/// assert_eq!(cfg.poll_interval().as_millis(), 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Base URL of the rendezvous server. Endpoint paths are appended to it.
    pub url: String,

    /// Milliseconds between poll ticks. A tick that fires while the previous
    /// poll is still outstanding is dropped.
    pub poll_interval_ms: u64,
}

impl SignalConfig {
    pub fn new(url: impl Into<String>, poll_interval_ms: u64) -> Self {
        Self {
            url: url.into(),
            poll_interval_ms,
        }
    }

    /// Poll interval as a [`Duration`], never shorter than one millisecond.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNAL_URL, DEFAULT_POLL_INTERVAL_MS)
    }
}
