//! Candidate envelope rewriting.
//!
//! The rendezvous wire carries ICE candidates flat:
//! `{"candidate": "...", "sdpMLineIndex": 0, "sdpMid": "0"}`. The
//! peer-connection provider emits and expects them nested one level:
//! `{"candidate": {"candidate": "...", "sdpMLineIndex": 0, "sdpMid": "0"}}`.
//! Offers and answers pass through both directions unchanged.

use serde_json::{Map, Value};

const CANDIDATE: &str = "candidate";
const SDP_MLINE_INDEX: &str = "sdpMLineIndex";
const SDP_MID: &str = "sdpMid";

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn candidate_of(payload: &Value) -> Option<&Value> {
    payload.get(CANDIDATE).filter(|c| is_truthy(c))
}

/// Rendezvous to provider: nests a flat candidate one level.
///
/// Only `candidate`, `sdpMLineIndex` and `sdpMid` are carried into the
/// nested object; the index and mid are omitted when absent.
pub fn wrap_inbound_candidate(payload: Value) -> Value {
    let Some(candidate) = candidate_of(&payload) else {
        return payload;
    };

    let mut inner = Map::new();
    inner.insert(CANDIDATE.to_string(), candidate.clone());
    for key in [SDP_MLINE_INDEX, SDP_MID] {
        if let Some(value) = payload.get(key) {
            inner.insert(key.to_string(), value.clone());
        }
    }

    let mut outer = Map::new();
    outer.insert(CANDIDATE.to_string(), Value::Object(inner));
    Value::Object(outer)
}

/// Provider to rendezvous: replaces a nested candidate envelope with its inner
/// object.
pub fn unwrap_outbound_candidate(payload: Value) -> Value {
    match candidate_of(&payload) {
        Some(inner) => inner.clone(),
        None => payload,
    }
}
