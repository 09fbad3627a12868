//! Reply body of the Dialogflow fulfillment protocol.

use serde::Serialize;
use serde_json::Value;

use crate::domain::content::{RichResponse, SimpleResponse};
use crate::domain::contexts::Context;
use crate::domain::system_intent::{SystemIntent, SystemIntentPayload};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogflowResponse {
    pub speech: String,
    pub data: DialogflowData,
    pub context_out: Vec<Context>,
}

/// Platform-specific payloads; only the Assistant's is produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogflowData {
    pub google: GooglePayload,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayload {
    pub expect_user_response: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ssml: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_response: Option<RichResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_input_prompts: Option<Vec<SimpleResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_intent: Option<SystemIntentOut>,
}

impl GooglePayload {
    /// Plain speech: SSML flag and no-input list are always present.
    pub fn speech(expect_user_response: bool, is_ssml: bool, no_inputs: Vec<SimpleResponse>) -> Self {
        Self {
            expect_user_response,
            is_ssml: Some(is_ssml),
            no_input_prompts: Some(no_inputs),
            ..Default::default()
        }
    }

    /// Rich content; no-inputs are sent only when there are some.
    pub fn rich(expect_user_response: bool, rich: RichResponse, no_inputs: Vec<SimpleResponse>) -> Self {
        Self {
            expect_user_response,
            rich_response: Some(rich),
            no_input_prompts: (!no_inputs.is_empty()).then_some(no_inputs),
            ..Default::default()
        }
    }

    pub fn with_system_intent(mut self, system_intent: &SystemIntent) -> Self {
        self.system_intent = Some(SystemIntentOut::from(system_intent));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemIntentOut {
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<Value>,
}

impl From<&SystemIntent> for SystemIntentOut {
    fn from(system_intent: &SystemIntent) -> Self {
        let value = Some(system_intent.payload.to_value());
        let (data, spec) = match system_intent.payload {
            SystemIntentPayload::Data(_) => (value, None),
            SystemIntentPayload::Spec(_) => (None, value),
        };
        Self {
            intent: system_intent.intent.clone(),
            data,
            spec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tell_with_speech() {
        let response = DialogflowResponse {
            speech: "hello".into(),
            data: DialogflowData {
                google: GooglePayload::speech(false, false, vec![]),
            },
            context_out: vec![],
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "speech": "hello",
                "data": {"google": {"expectUserResponse": false, "isSsml": false, "noInputPrompts": []}},
                "contextOut": []
            })
        );
    }

    #[test]
    fn rich_payload_skips_speech_fields() {
        let mut rich = RichResponse::new();
        rich.add_speech("hello", Some("hi"));
        let value = serde_json::to_value(GooglePayload::rich(false, rich, vec![])).unwrap();
        assert_eq!(
            value,
            json!({
                "expectUserResponse": false,
                "richResponse": {
                    "items": [{"simpleResponse": {"textToSpeech": "hello", "displayText": "hi"}}],
                    "suggestions": []
                }
            })
        );
    }
}
