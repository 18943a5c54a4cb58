//! Encoder for the input wire protocol (consumer side).
//!
//! Local pointer presses and releases are converted to capture-surface
//! coordinates and wrapped into `touch` envelopes. Multi-touch is not modelled:
//! the pointer id is always 1.

use serde::{Deserialize, Serialize};

use crate::protocol::decoder::InputProtocolError;
use crate::protocol::messages::{
    KeyState, KeyboardData, KeyboardMessage, TouchData, TouchMessage, TouchPointer, TouchState,
    WireMessage, KEYBOARD_TYPE, TOUCH_TYPE,
};

/// Pointer id stamped on every encoded touch.
pub const POINTER_ID: u32 = 1;

/// Primitive surface event the encoder listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceEvent {
    MouseDown,
    MouseUp,
}

impl SurfaceEvent {
    /// Name of the originating primitive event, used to key encoded output.
    pub fn name(self) -> &'static str {
        match self {
            SurfaceEvent::MouseDown => "mousedown",
            SurfaceEvent::MouseUp => "mouseup",
        }
    }

    fn touch_state(self) -> TouchState {
        match self {
            SurfaceEvent::MouseDown => TouchState::Start,
            SurfaceEvent::MouseUp => TouchState::End,
        }
    }
}

/// A press or release observed on the local surface, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPress {
    pub event: SurfaceEvent,
    pub client_x: f64,
    pub client_y: f64,
}

/// Top-left corner of the capture surface in client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceOrigin {
    pub left: f64,
    pub top: f64,
}

/// One encoded touch, keyed by the surface event that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedInput {
    pub event: SurfaceEvent,
    pub message: TouchMessage,
}

/// Encodes a pointer press or release relative to `origin`.
pub fn encode_pointer(press: &PointerPress, origin: SurfaceOrigin) -> EncodedInput {
    let pointer = TouchPointer {
        id: POINTER_ID,
        state: press.event.touch_state(),
        x: press.client_x - origin.left,
        y: press.client_y - origin.top,
        z: 0.0,
    };
    EncodedInput {
        event: press.event,
        message: WireMessage::new(
            TOUCH_TYPE,
            TouchData {
                pointers: vec![pointer],
            },
        ),
    }
}

/// Encodes a key transition.
pub fn encode_key(key: &str, state: KeyState) -> KeyboardMessage {
    WireMessage::new(
        KEYBOARD_TYPE,
        KeyboardData {
            key: key.to_string(),
            state,
        },
    )
}

/// Serializes an envelope to the bytes sent over the data channel.
///
/// # Errors
///
/// Returns [`InputProtocolError::Malformed`] if the payload cannot be
/// serialized.
pub fn to_wire_bytes<T: Serialize>(message: &WireMessage<T>) -> Result<Vec<u8>, InputProtocolError> {
    Ok(serde_json::to_vec(message)?)
}
