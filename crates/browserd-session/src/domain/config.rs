//! Boot configuration handed from the control side to the capture side.
//!
//! The control process resolves every setting (rendezvous server, capture
//! window title, ICE servers) and passes one [`BootConfig`] to the capture
//! process when it starts it, serialized as TOML. There is no shared global
//! store: the capture side owns its copy.
//!
//! ```toml
//! [signal]
//! url = "http://localhost:3000"
//! poll_interval_ms = 1000
//!
//! [browser]
//! capture_window_title = "example.com"
//!
//! [[browser.ice_servers]]
//! urls = ["turn:turn.example.com:3478"]
//! username = "user"
//! credential = "secret"
//! ```

use std::path::{Path, PathBuf};

use browserd_signal::SignalConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Everything the capture side needs to boot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootConfig {
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Name of the window to capture. Also the prefix of the provider's peer
    /// name on the rendezvous server.
    #[serde(default)]
    pub capture_window_title: String,

    #[serde(default)]
    pub ice_servers: Vec<IceServer>,
}

/// A STUN or TURN server handed to the peer-connection provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServer {
    /// A server that needs no credentials (typically STUN).
    pub fn open(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

impl BootConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reads a config file written by [`BootConfig::save`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = self.to_toml_string()?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BootConfig {
        BootConfig {
            signal: SignalConfig::new("http://rv.example.com:3000", 250),
            browser: BrowserConfig {
                capture_window_title: "example.com".to_string(),
                ice_servers: vec![
                    IceServer::open("stun:stun.example.com:19302"),
                    IceServer {
                        urls: vec!["turn:turn.example.com:3478".to_string()],
                        username: Some("user".to_string()),
                        credential: Some("secret".to_string()),
                    },
                ],
            },
        }
    }

    #[test]
    fn test_handoff_survives_toml() {
        let config = sample();
        let text = config.to_toml_string().unwrap();
        assert_eq!(BootConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = BootConfig::from_toml_str("[browser]\ncapture_window_title = \"x\"\n").unwrap();
        assert_eq!(config.signal, SignalConfig::default());
        assert_eq!(config.browser.capture_window_title, "x");
        assert!(config.browser.ice_servers.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = BootConfig::from_toml_str("[signal\nurl = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("browserd-missing-{}.toml", uuid::Uuid::new_v4()));
        let result = BootConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("browserd-boot-{}.toml", uuid::Uuid::new_v4()));
        let config = sample();

        config.save(&path).unwrap();
        let loaded = BootConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }
}
