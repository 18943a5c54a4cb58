//! Decoder for the input wire protocol.
//!
//! Turns a [`WireMessage`] received over the data channel into zero or more
//! [`ReplayEvent`]s. Version and type mismatches reject the whole message;
//! unrecognised pointer or key states are dropped without error.

use serde_json::{Number, Value};
use thiserror::Error;
use tracing::{debug, trace};

use crate::keymap::{cased_key_name, classify, printable_needs_shift, KeyClass};
use crate::protocol::messages::{
    KeyInput, KeyState, KeyboardData, MouseInput, ReplayEvent, TouchData, TouchState,
    WireMessage, KEYBOARD_TYPE, PROTOCOL_VERSION, TOUCH_TYPE,
};

/// Errors produced while decoding an input message.
#[derive(Debug, Error, PartialEq)]
pub enum InputProtocolError {
    /// The envelope's version is not numerically [`PROTOCOL_VERSION`].
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(Number),

    /// The envelope's type is neither `touch` nor `keyboard`.
    #[error("unsupported message type: {0:?}")]
    UnsupportedType(String),

    /// The bytes are not JSON, or the payload does not match its declared type.
    #[error("malformed message: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for InputProtocolError {
    fn from(err: serde_json::Error) -> Self {
        InputProtocolError::Malformed(err.to_string())
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes raw data-channel bytes (UTF-8 JSON) into replay events.
///
/// # Errors
///
/// Returns [`InputProtocolError::Malformed`] if the bytes are not a JSON
/// envelope, and the errors of [`decode_message`] otherwise.
pub fn decode_bytes(bytes: &[u8]) -> Result<Vec<ReplayEvent>, InputProtocolError> {
    let envelope: WireMessage<Value> = serde_json::from_slice(bytes)?;
    decode_message(envelope)
}

/// Decodes one envelope into replay events.
///
/// The version is checked before the type, so an envelope that is wrong on
/// both counts reports [`InputProtocolError::UnsupportedVersion`].
///
/// # Examples
///
/// ```rust
/// use browserd_core::protocol::{decode_message, ReplayEvent, WireMessage};
/// use serde_json::json;
///
/// let msg: WireMessage<serde_json::Value> = serde_json::from_value(json!({
///     "type": "touch",
///     "version": 1,
///     "data": {"pointers": [{"id": 1, "state": "start", "x": 10, "y": 10}]}
/// })).unwrap();
///
/// let events = decode_message(msg).unwrap();
/// assert!(matches!(events.as_slice(), [ReplayEvent::MouseDown(_)]));
/// ```
pub fn decode_message(message: WireMessage<Value>) -> Result<Vec<ReplayEvent>, InputProtocolError> {
    if !message.is_current_version() {
        return Err(InputProtocolError::UnsupportedVersion(message.version));
    }

    match message.kind.as_str() {
        TOUCH_TYPE => {
            let data: TouchData = serde_json::from_value(message.data)?;
            Ok(decode_touch(&data))
        }
        KEYBOARD_TYPE => {
            let data: KeyboardData = serde_json::from_value(message.data)?;
            Ok(decode_keyboard(&data).into_iter().collect())
        }
        other => Err(InputProtocolError::UnsupportedType(other.to_string())),
    }
}

/// Maps each pointer to a left-button press or release. Pointers in any other
/// state produce nothing.
pub fn decode_touch(data: &TouchData) -> Vec<ReplayEvent> {
    data.pointers
        .iter()
        .filter_map(|p| match p.state {
            TouchState::Start => Some(ReplayEvent::MouseDown(MouseInput::left_click(p.x, p.y))),
            TouchState::End => Some(ReplayEvent::MouseUp(MouseInput::left_click(p.x, p.y))),
            TouchState::Move | TouchState::Other => {
                trace!(pointer = p.id, state = ?p.state, "dropping pointer");
                None
            }
        })
        .collect()
}

/// Maps one key message to at most one replay event.
pub fn decode_keyboard(data: &KeyboardData) -> Option<ReplayEvent> {
    let pressed = match data.state {
        KeyState::Pressed => true,
        KeyState::Released => false,
        KeyState::Other => {
            trace!(key = %data.key, "dropping key with unknown state");
            return None;
        }
    };

    let key_event = |input: KeyInput| {
        if pressed {
            ReplayEvent::KeyDown(input)
        } else {
            ReplayEvent::KeyUp(input)
        }
    };

    match classify(&data.key) {
        KeyClass::Printable => {
            if !pressed {
                return None;
            }
            let modifiers = if printable_needs_shift(&data.key) {
                vec!["Shift".to_string()]
            } else {
                Vec::new()
            };
            Some(ReplayEvent::Char(KeyInput {
                key_code: Some(data.key.clone()),
                modifiers,
            }))
        }
        KeyClass::Modifier => Some(key_event(KeyInput {
            key_code: None,
            modifiers: vec![cased_key_name(&data.key)],
        })),
        KeyClass::Special => Some(key_event(KeyInput {
            key_code: Some(cased_key_name(&data.key)),
            modifiers: Vec::new(),
        })),
        KeyClass::Unknown => {
            debug!(key = %data.key, "unrecognised key name, emitting bare key event");
            Some(key_event(KeyInput::default()))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
