//! Peer roster as reported by the rendezvous server.
//!
//! Wire format: one record per line, `name,id,connectedFlag`, where the flag is
//! `1` for connected and anything else for not connected. Empty lines are
//! ignored, so an empty body is an empty roster.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A peer known to the rendezvous server. Rebuilt from scratch on every
/// roster response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerIdentity {
    pub id: String,
    pub name: String,
    pub connected: bool,
}

impl PeerIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, connected: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            connected,
        }
    }
}

/// Ordered roster. Each update replaces the previous one wholesale.
pub type PeerRoster = Vec<PeerIdentity>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RosterError {
    /// A record did not split into exactly three comma-separated fields.
    #[error("invalid peer line: {0:?}")]
    InvalidPeerLine(String),
}

/// Parses roster text.
///
/// # Errors
///
/// Returns [`RosterError::InvalidPeerLine`] for the first non-empty line that
/// does not have exactly three fields.
pub fn parse_roster(text: &str) -> Result<PeerRoster, RosterError> {
    text.split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            match fields.as_slice() {
                [name, id, flag] => Ok(PeerIdentity::new(*id, *name, *flag == "1")),
                _ => Err(RosterError::InvalidPeerLine(line.to_string())),
            }
        })
        .collect()
}

/// Serializes a roster back to its wire text, one `name,id,0|1` line per peer.
pub fn serialize_roster(roster: &[PeerIdentity]) -> String {
    roster
        .iter()
        .map(|p| format!("{},{},{}", p.name, p.id, if p.connected { "1" } else { "0" }))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the first peer whose id differs from `own_id`.
pub fn find_counterpart<'a>(roster: &'a [PeerIdentity], own_id: &str) -> Option<&'a PeerIdentity> {
    roster.iter().find(|p| p.id != own_id)
}
