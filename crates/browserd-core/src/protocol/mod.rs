//! Input protocol module containing the wire message types, the encoder, and
//! the decoder.

pub mod decoder;
pub mod encoder;
pub mod messages;

pub use decoder::{decode_bytes, decode_message, InputProtocolError};
pub use encoder::{encode_key, encode_pointer, to_wire_bytes, EncodedInput};
pub use messages::*;
