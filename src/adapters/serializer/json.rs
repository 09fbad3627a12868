//! JSON token encoding.

use serde_json::Value;

use crate::ports::{Serializer, SerializerError};

/// Encodes the dialog state as compact JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<String, SerializerError> {
        serde_json::to_string(value).map_err(|e| SerializerError::SerializationFailed(e.to_string()))
    }

    fn deserialize(&self, token: &str) -> Result<Value, SerializerError> {
        serde_json::from_str(token).map_err(|e| SerializerError::DeserializationFailed(e.to_string()))
    }
}
