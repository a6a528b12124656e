//! CBOR encoding for everything that goes to disk.
//!
//! `ciborium` encodes structs as maps in field declaration order and
//! `BTreeMap`s in key order, so one snapshot always yields one byte string.
//! The state file checksum is computed over those bytes.
//!
//! Decoding is strict: the input must hold exactly one CBOR item.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("CBOR encoding failed: {0}")]
    Encode(String),

    #[error("CBOR decoding failed: {0}")]
    Decode(String),

    #[error("CBOR decoding failed: {0} unexpected trailing bytes")]
    TrailingBytes(usize),
}

/// Encode `value` into a fresh buffer.
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let mut out = Vec::with_capacity(256);
    ciborium::into_writer(value, &mut out)
        .map_err(|e| SerializationError::Encode(e.to_string()))?;
    Ok(out)
}

/// Decode exactly one item from `bytes`.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    let mut rest = bytes;
    let value = ciborium::from_reader(&mut rest)
        .map_err(|e| SerializationError::Decode(e.to_string()))?;
    if !rest.is_empty() {
        return Err(SerializationError::TrailingBytes(rest.len()));
    }
    Ok(value)
}
