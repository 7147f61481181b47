//! Body encoding and decoding.
//!
//! The builder serializes request bodies through a [`BodyEncoder`] and the
//! executor deserializes success bodies through a [`BodyDecoder`]. Both can be
//! swapped per call; [`JsonCodec`] is the default for each.

use crate::error::BoxError;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serializes a value into request body bytes.
pub trait BodyEncoder: Send + Sync {
    /// Encode `value`.
    fn encode<T>(&self, value: &T) -> Result<Bytes, BoxError>
    where
        T: Serialize + ?Sized;

    /// Media type of the encoded bytes, used as `Content-Type` when the
    /// request has none yet.
    fn content_type(&self) -> Option<&'static str> {
        None
    }
}

/// Deserializes response body bytes into a value.
pub trait BodyDecoder: Send + Sync {
    /// Decode `bytes` into `T`.
    fn decode<T>(&self, bytes: &[u8]) -> Result<T, BoxError>
    where
        T: DeserializeOwned;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl BodyEncoder for JsonCodec {
    fn encode<T>(&self, value: &T) -> Result<Bytes, BoxError>
    where
        T: Serialize + ?Sized,
    {
        Ok(Bytes::from(serde_json::to_vec(value)?))
    }

    fn content_type(&self) -> Option<&'static str> {
        Some("application/json")
    }
}

impl BodyDecoder for JsonCodec {
    fn decode<T>(&self, bytes: &[u8]) -> Result<T, BoxError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_slice(bytes)?)
    }
}
