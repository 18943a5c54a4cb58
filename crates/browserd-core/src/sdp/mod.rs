//! Session-description transforms applied before a description is handed to
//! the peer-connection provider.
//!
//! [`CodecPrioritizer`] moves the preferred video codec (H264 by default) to
//! the front of every video section's payload order, so that the remote end
//! picks it during negotiation. Audio and data sections pass through as-is.

use std::io::Cursor;

use thiserror::Error;
use tracing::debug;
use webrtc::sdp::description::media::MediaDescription;
use webrtc::sdp::description::session::SessionDescription;

/// Codec preferred by default for captured video.
pub const DEFAULT_VIDEO_CODEC: &str = "H264";

const VIDEO_MEDIA: &str = "video";
const RTPMAP_ATTRIBUTE: &str = "rtpmap";
const MISSING_PAYLOADS: &str = "missing payloads";

#[derive(Debug, Error, PartialEq)]
pub enum SdpError {
    /// The text is not a session description, or a video section has no
    /// payload list.
    #[error("malformed session description: {0}")]
    MalformedInput(String),
}

/// A pure text transform over session descriptions.
pub trait SdpTransform: Send + Sync {
    /// Returns the transformed description.
    ///
    /// # Errors
    ///
    /// Returns [`SdpError::MalformedInput`] when `sdp` cannot be parsed or
    /// violates the transform's structural expectations.
    fn transform_sdp(&self, sdp: &str) -> Result<String, SdpError>;
}

/// Reorders video payloads so the configured codec comes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecPrioritizer {
    codec: String,
}

impl Default for CodecPrioritizer {
    fn default() -> Self {
        Self::new(DEFAULT_VIDEO_CODEC)
    }
}

impl CodecPrioritizer {
    pub fn new(codec: impl Into<String>) -> Self {
        Self {
            codec: codec.into(),
        }
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }

    /// Reorders every video section of a parsed description in place.
    ///
    /// # Errors
    ///
    /// Returns [`SdpError::MalformedInput`] if a video section has an empty
    /// payload list, even when the preferred codec is absent.
    pub fn prioritize(&self, session: &mut SessionDescription) -> Result<(), SdpError> {
        for media in session
            .media_descriptions
            .iter_mut()
            .filter(|m| m.media_name.media == VIDEO_MEDIA)
        {
            self.prioritize_media(media)?;
        }
        Ok(())
    }

    /// Moves the first payload whose `rtpmap` names the preferred codec to the
    /// front of the section's format list. No match leaves the list untouched.
    pub fn prioritize_media(&self, media: &mut MediaDescription) -> Result<(), SdpError> {
        if media.media_name.formats.is_empty() {
            return Err(SdpError::MalformedInput(MISSING_PAYLOADS.to_string()));
        }

        let Some(payload) = self.first_matching_payload(media) else {
            return Ok(());
        };

        media.media_name.formats.retain(|f| *f != payload);
        media.media_name.formats.insert(0, payload);
        debug!(codec = %self.codec, formats = ?media.media_name.formats, "prioritized video codec");
        Ok(())
    }

    fn first_matching_payload(&self, media: &MediaDescription) -> Option<String> {
        media
            .attributes
            .iter()
            .filter(|a| a.key == RTPMAP_ATTRIBUTE)
            .filter_map(|a| a.value.as_deref())
            .find_map(|value| {
                // "<payload> <codec>/<clock rate>[/<channels>]"
                let (payload, encoding) = value.split_once(' ')?;
                let codec = encoding.split('/').next()?;
                (codec == self.codec).then(|| payload.trim().to_string())
            })
    }
}

/// `m=video <port> <proto>` with no formats after it. The parser rejects such
/// a line with a generic syntax error, so it is caught on the text first.
fn check_video_payloads(sdp: &str) -> Result<(), SdpError> {
    let empty = sdp
        .lines()
        .filter_map(|line| line.strip_prefix("m=video"))
        .any(|rest| rest.split_whitespace().count() < 3);
    if empty {
        return Err(SdpError::MalformedInput(MISSING_PAYLOADS.to_string()));
    }
    Ok(())
}

impl SdpTransform for CodecPrioritizer {
    fn transform_sdp(&self, sdp: &str) -> Result<String, SdpError> {
        check_video_payloads(sdp)?;
        let mut session = SessionDescription::unmarshal(&mut Cursor::new(sdp.as_bytes()))
            .map_err(|e| SdpError::MalformedInput(e.to_string()))?;
        self.prioritize(&mut session)?;
        Ok(session.marshal())
    }
}
