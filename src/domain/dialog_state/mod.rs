//! Dialog state - the only thing that survives between turns.
//!
//! Actions SDK carries it as the `conversationToken` string; Dialogflow
//! carries it as the parameters of the hidden `_actions_on_google_` context.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::warn;

use crate::ports::{Serializer, SerializerError};

/// Caller-opaque `{state, data}` pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DialogState {
    #[serde(default)]
    pub state: Value,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl DialogState {
    pub fn new(state: Value, data: Map<String, Value>) -> Self {
        Self { state, data }
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_null() && self.data.is_empty()
    }

    /// The JSON object written into the token or context parameters.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("state".to_string(), self.state.clone());
        object.insert("data".to_string(), Value::Object(self.data.clone()));
        Value::Object(object)
    }

    /// Reads a `{state, data}` object.
    ///
    /// A map without an object-valued `data` key is taken to be the data
    /// itself, which is how older agents wrote the context parameters.
    pub fn from_parameters(parameters: &Map<String, Value>) -> Self {
        match parameters.get("data") {
            Some(Value::Object(data)) => Self {
                state: parameters.get("state").cloned().unwrap_or(Value::Null),
                data: data.clone(),
            },
            _ => Self {
                state: Value::Null,
                data: parameters.clone(),
            },
        }
    }
}

/// Encodes and decodes dialog state tokens through an injected serializer.
#[derive(Clone)]
pub struct DialogStateCodec {
    serializer: Arc<dyn Serializer>,
}

impl DialogStateCodec {
    pub fn new(serializer: Arc<dyn Serializer>) -> Self {
        Self { serializer }
    }

    /// Encodes `{state, data}` into a token.
    pub fn encode(&self, state: &DialogState) -> Result<String, SerializerError> {
        self.serializer.serialize(&state.to_value())
    }

    /// Encodes an arbitrary caller-provided state object as the token.
    pub fn encode_raw(&self, value: &Value) -> Result<String, SerializerError> {
        self.serializer.serialize(value)
    }

    /// Decodes a token. Blank or absent tokens yield empty state; tokens
    /// that fail to decode are logged and also yield empty state.
    pub fn decode(&self, token: Option<&str>) -> DialogState {
        let token = match token {
            Some(t) if !t.trim().is_empty() => t,
            _ => return DialogState::default(),
        };

        match self.serializer.deserialize(token) {
            Ok(Value::Object(map)) => DialogState::from_parameters(&map),
            Ok(other) => {
                warn!(token_kind = %json_kind(&other), "dialog state token is not an object, using empty state");
                DialogState::default()
            }
            Err(e) => {
                warn!(error = %e, "failed to decode dialog state token, using empty state");
                DialogState::default()
            }
        }
    }
}

impl std::fmt::Debug for DialogStateCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogStateCodec").finish_non_exhaustive()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct PlainJson;

    impl Serializer for PlainJson {
        fn serialize(&self, value: &Value) -> Result<String, SerializerError> {
            serde_json::to_string(value)
                .map_err(|e| SerializerError::SerializationFailed(e.to_string()))
        }

        fn deserialize(&self, token: &str) -> Result<Value, SerializerError> {
            serde_json::from_str(token)
                .map_err(|e| SerializerError::DeserializationFailed(e.to_string()))
        }
    }

    fn codec() -> DialogStateCodec {
        DialogStateCodec::new(Arc::new(PlainJson))
    }

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    mod codec {
        use super::*;

        #[test]
        fn round_trips_state_and_data() {
            let original = DialogState::new(
                json!("asking_city"),
                data(json!({"count": 3, "cities": ["Rome", "Paris"], "nested": {"a": true}})),
            );
            let token = codec().encode(&original).unwrap();
            assert_eq!(codec().decode(Some(&token)), original);
        }

        #[test]
        fn round_trips_empty_state() {
            let token = codec().encode(&DialogState::default()).unwrap();
            let parsed: Value = serde_json::from_str(&token).unwrap();
            assert_eq!(parsed, json!({"state": null, "data": {}}));
            assert_eq!(codec().decode(Some(&token)), DialogState::default());
        }

        #[test]
        fn blank_token_is_empty_state() {
            assert!(codec().decode(None).is_empty());
            assert!(codec().decode(Some("")).is_empty());
            assert!(codec().decode(Some("   ")).is_empty());
        }

        #[test]
        fn garbage_token_is_empty_state() {
            assert!(codec().decode(Some("{not json")).is_empty());
            assert!(codec().decode(Some("42")).is_empty());
        }

        #[test]
        fn raw_state_is_encoded_verbatim() {
            let token = codec().encode_raw(&json!({"carType": "big"})).unwrap();
            assert_eq!(token, r#"{"carType":"big"}"#);
        }
    }

    mod parameters {
        use super::*;

        #[test]
        fn reads_state_and_data_object() {
            let state = DialogState::from_parameters(&data(json!({"state": "s", "data": {"k": 1}})));
            assert_eq!(state.state, json!("s"));
            assert_eq!(state.data, data(json!({"k": 1})));
        }

        #[test]
        fn flat_parameters_are_data() {
            let state = DialogState::from_parameters(&data(json!({"k": 1})));
            assert!(state.state.is_null());
            assert_eq!(state.data, data(json!({"k": 1})));
        }
    }
}
