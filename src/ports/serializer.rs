//! Serializer Port - Interface for encoding the dialog state token.
//!
//! The dialog state is carried between turns as a single opaque string.
//! This port decides how a JSON value becomes that string and back; the
//! protocol layer never touches the text format itself.

use serde_json::Value;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors that can occur while encoding or decoding a token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializerError {
    #[error("Failed to serialize value: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize token: {0}")]
    DeserializationFailed(String),
}

/// Port for turning dialog state into a token string and back.
///
/// # Contract
///
/// Implementations must round-trip plain JSON values exactly:
/// `deserialize(serialize(v)?)? == v` for maps, strings, numbers, lists.
pub trait Serializer: Send + Sync {
    /// Encode a value into a token string.
    ///
    /// # Errors
    /// Returns `SerializationFailed` if the value cannot be encoded
    fn serialize(&self, value: &Value) -> Result<String, SerializerError>;

    /// Decode a token string back into a value.
    ///
    /// # Errors
    /// Returns `DeserializationFailed` if the token is not a valid encoding
    fn deserialize(&self, token: &str) -> Result<Value, SerializerError>;
}

impl From<SerializerError> for DomainError {
    fn from(err: SerializerError) -> Self {
        DomainError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}
