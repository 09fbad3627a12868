//! The raw inbound webhook request.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::foundation::{DomainError, ErrorCode};

/// One inbound HTTP request: headers plus the parsed JSON body.
///
/// Immutable once built. Header names are stored lowercased so lookups are
/// case-insensitive, matching HTTP semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct WireEnvelope {
    headers: BTreeMap<String, String>,
    body: Value,
}

impl WireEnvelope {
    pub fn new<K, V>(headers: impl IntoIterator<Item = (K, V)>, body: Value) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.into().to_ascii_lowercase(), v.into()))
            .collect();
        Self { headers, body }
    }

    /// Builds an envelope from raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns `MalformedRequest` if the body is not valid JSON.
    pub fn from_bytes<K, V>(
        headers: impl IntoIterator<Item = (K, V)>,
        bytes: &[u8],
    ) -> Result<Self, DomainError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let body: Value = serde_json::from_slice(bytes).map_err(|e| {
            DomainError::new(ErrorCode::MalformedRequest, "Request body is not valid JSON")
                .with_detail("cause", e.to_string())
        })?;
        Ok(Self::new(headers, body))
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Deserializes the body into a typed request model.
    pub fn parse_body<T: DeserializeOwned>(&self) -> Result<T, DomainError> {
        T::deserialize(&self.body).map_err(|e| {
            DomainError::new(
                ErrorCode::MalformedRequest,
                "Request body does not match the expected shape",
            )
            .with_detail("cause", e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_lookup_ignores_case() {
        let env = WireEnvelope::new([("Google-Actions-API-Version", "2")], json!({}));
        assert_eq!(env.header("google-actions-api-version"), Some("2"));
        assert_eq!(env.header("GOOGLE-ACTIONS-API-VERSION"), Some("2"));
        assert_eq!(env.header("Content-Type"), None);
    }

    #[test]
    fn from_bytes_parses_json() {
        let env = WireEnvelope::from_bytes(Vec::<(String, String)>::new(), br#"{"a": 1}"#).unwrap();
        assert_eq!(env.body(), &json!({"a": 1}));
    }

    #[test]
    fn from_bytes_rejects_garbage() {
        let err = WireEnvelope::from_bytes(Vec::<(String, String)>::new(), b"not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedRequest);
        assert!(err.details.contains_key("cause"));
    }
}
