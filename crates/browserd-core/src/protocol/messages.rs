//! Message type definitions for the browserd input wire protocol.
//!
//! Every message on the data channel is a JSON envelope:
//! ```text
//! {"type": "touch" | "keyboard", "version": 1, "data": {...}}
//! ```
//! The decoder turns envelopes into [`ReplayEvent`]s, the primitive events an
//! injection sink replays against the local system.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Current protocol version. Envelopes carrying any other version are rejected.
pub const PROTOCOL_VERSION: i64 = 1;

/// Wire identifier for touch (pointer) messages.
pub const TOUCH_TYPE: &str = "touch";

/// Wire identifier for keyboard messages.
pub const KEYBOARD_TYPE: &str = "keyboard";

/// Versioned envelope wrapping every input message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage<T> {
    /// Message kind, `"touch"` or `"keyboard"` for the input protocol.
    #[serde(rename = "type")]
    pub kind: String,
    /// Any JSON number. `1` and `1.0` are the same version.
    pub version: Number,
    pub data: T,
}

impl<T> WireMessage<T> {
    /// Wraps `data` in an envelope of the current protocol version.
    pub fn new(kind: &str, data: T) -> Self {
        Self {
            kind: kind.to_string(),
            version: Number::from(PROTOCOL_VERSION),
            data,
        }
    }

    /// Numeric comparison against [`PROTOCOL_VERSION`].
    pub fn is_current_version(&self) -> bool {
        self.version.as_f64() == Some(PROTOCOL_VERSION as f64)
    }
}

/// Touch envelope as produced by the encoder.
pub type TouchMessage = WireMessage<TouchData>;

/// Keyboard envelope as produced by the encoder.
pub type KeyboardMessage = WireMessage<KeyboardData>;

// ── Touch ─────────────────────────────────────────────────────────────────────

/// Phase of a single pointer contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchState {
    Start,
    End,
    Move,
    /// Any state this version does not understand; dropped on decode.
    #[serde(other)]
    Other,
}

/// One pointer contact, in capture-surface coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchPointer {
    #[serde(deserialize_with = "de_pointer_id")]
    pub id: u32,
    pub state: TouchState,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchData {
    pub pointers: Vec<TouchPointer>,
}

/// Accepts the pointer id either as a JSON number or as a numeric string.
fn de_pointer_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u32),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid pointer id: {s:?}"))),
    }
}

// ── Keyboard ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyState {
    Pressed,
    Released,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardData {
    pub key: String,
    pub state: KeyState,
}

// ── Replay events ─────────────────────────────────────────────────────────────

/// Mouse button reported in replayed mouse events. Only the primary button is
/// produced by this protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseInput {
    pub button: MouseButton,
    pub click_count: u32,
    pub x: f64,
    pub y: f64,
}

impl MouseInput {
    /// A single left click at `(x, y)`.
    pub fn left_click(x: f64, y: f64) -> Self {
        Self {
            button: MouseButton::Left,
            click_count: 1,
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_code: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

/// Primitive input event handed to the injection sink.
///
/// Serializes with a `type` tag of `mouseDown`, `mouseUp`, `keyDown`, `keyUp`
/// or `char`, followed by the variant's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReplayEvent {
    MouseDown(MouseInput),
    MouseUp(MouseInput),
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    Char(KeyInput),
}

impl ReplayEvent {
    /// The event's wire tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            ReplayEvent::MouseDown(_) => "mouseDown",
            ReplayEvent::MouseUp(_) => "mouseUp",
            ReplayEvent::KeyDown(_) => "keyDown",
            ReplayEvent::KeyUp(_) => "keyUp",
            ReplayEvent::Char(_) => "char",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pointer_id_accepts_number_and_numeric_string() {
        let from_number: TouchPointer =
            serde_json::from_value(json!({"id": 1, "state": "start", "x": 1.0, "y": 2.0}))
                .unwrap();
        let from_string: TouchPointer =
            serde_json::from_value(json!({"id": "7", "state": "end", "x": 1, "y": 2, "z": 0}))
                .unwrap();

        assert_eq!(from_number.id, 1);
        assert_eq!(from_number.z, 0.0);
        assert_eq!(from_string.id, 7);
        assert_eq!(from_string.state, TouchState::End);
    }

    #[test]
    fn test_pointer_id_rejects_non_numeric_string() {
        let result: Result<TouchPointer, _> =
            serde_json::from_value(json!({"id": "one", "state": "start", "x": 0, "y": 0}));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_states_deserialize_to_other() {
        let touch: TouchState = serde_json::from_value(json!("cancel")).unwrap();
        let key: KeyState = serde_json::from_value(json!("repeat")).unwrap();
        assert_eq!(touch, TouchState::Other);
        assert_eq!(key, KeyState::Other);
    }

    #[test]
    fn test_mouse_replay_event_serializes_with_camel_case_tag() {
        let event = ReplayEvent::MouseDown(MouseInput::left_click(10.0, 20.0));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"type": "mouseDown", "button": "left", "clickCount": 1, "x": 10.0, "y": 20.0})
        );
    }

    #[test]
    fn test_key_replay_event_omits_absent_key_code() {
        let event = ReplayEvent::KeyDown(KeyInput {
            key_code: None,
            modifiers: vec!["Shift".to_string()],
        });
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value, json!({"type": "keyDown", "modifiers": ["Shift"]}));
        assert_eq!(event.type_name(), "keyDown");
    }

    #[test]
    fn test_wire_message_new_uses_current_version() {
        let msg = WireMessage::new(TOUCH_TYPE, TouchData { pointers: vec![] });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"type": "touch", "version": 1, "data": {"pointers": []}}));
    }
}
