use crate::error::{AdaptorError, DecodeError};
use serde::{Deserialize, Deserializer, Serialize};

/// Length of the message digest signed by BIP-340.
pub const MESSAGE_LEN: usize = 32;

/// Copy `bytes` into a fixed-size array, failing with a length error that names `field`.
pub fn decode_array<const N: usize>(field: &'static str, bytes: &[u8]) -> Result<[u8; N], DecodeError> {
    bytes.try_into().map_err(|_| DecodeError::invalid_length(field, N, bytes.len()))
}

/// Decode a fixed-size array from a hex string.
pub fn array_from_hex_str<const N: usize>(field: &'static str, hex_str: &str) -> Result<[u8; N], DecodeError> {
    let bytes = hex::decode(hex_str.trim())?;
    decode_array(field, &bytes)
}

/// Messages are 32-byte digests. Any other length is rejected.
pub fn message_digest(msg: &[u8]) -> Result<[u8; MESSAGE_LEN], AdaptorError> {
    msg.try_into().map_err(|_| {
        AdaptorError::invalid_input(format!("message must be exactly {MESSAGE_LEN} bytes, got {}", msg.len()))
    })
}

/// Serialize bytes as a lowercase hex string. For use with `#[serde(serialize_with)]`.
pub fn to_hex<S>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    hex::encode(bytes).serialize(s)
}

pub fn array_from_hex<'de, D>(de: D) -> Result<[u8; 32], D::Error>
where
    D: Deserializer<'de>,
{
    let hex_str = String::deserialize(de)?;
    let mut result = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut result)
        .map_err(|e| serde::de::Error::custom(format!("Invalid hex string: {e}")))?;
    Ok(result)
}
