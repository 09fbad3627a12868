//! Reply body of the raw Actions SDK protocol.

use serde::Serialize;
use serde_json::Value;

use crate::domain::content::{RichResponse, SimpleResponse};
use crate::domain::protocol::{ApiGeneration, StandardIntent};
use crate::domain::system_intent::{SystemIntent, SystemIntentPayload};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_token: Option<String>,
    pub expect_user_response: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected_inputs: Vec<ExpectedInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_response: Option<FinalResponse>,
}

impl ActionResponse {
    /// A reply that keeps the conversation open.
    pub fn ask(conversation_token: String, expected_input: ExpectedInput) -> Self {
        Self {
            conversation_token: Some(conversation_token),
            expect_user_response: true,
            expected_inputs: vec![expected_input],
            final_response: None,
        }
    }

    /// A reply that ends the conversation.
    pub fn tell(final_response: FinalResponse) -> Self {
        Self {
            conversation_token: None,
            expect_user_response: false,
            expected_inputs: Vec::new(),
            final_response: Some(final_response),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedInput {
    pub input_prompt: InputPrompt,
    pub possible_intents: Vec<ExpectedIntent>,
}

/// What the user hears or sees while the platform waits for input.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPrompt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_prompts: Option<Vec<SimpleResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_initial_prompt: Option<RichResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_input_prompts: Option<Vec<SimpleResponse>>,
}

impl InputPrompt {
    /// Spoken prompt; the no-input list is always present.
    pub fn speech(initial: SimpleResponse, no_inputs: Vec<SimpleResponse>) -> Self {
        Self {
            initial_prompts: Some(vec![initial]),
            rich_initial_prompt: None,
            no_input_prompts: Some(no_inputs),
        }
    }

    /// Rich prompt; no-inputs are sent only when there are some.
    pub fn rich(rich: RichResponse, no_inputs: Vec<SimpleResponse>) -> Self {
        Self {
            initial_prompts: None,
            rich_initial_prompt: Some(rich),
            no_input_prompts: (!no_inputs.is_empty()).then_some(no_inputs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedIntent {
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_value_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_value_spec: Option<Value>,
}

impl ExpectedIntent {
    /// Free text input, the default for a plain ask.
    pub fn text(generation: ApiGeneration) -> Self {
        Self {
            intent: StandardIntent::Text.name(generation).to_string(),
            input_value_data: None,
            input_value_spec: None,
        }
    }
}

impl From<&SystemIntent> for ExpectedIntent {
    fn from(system_intent: &SystemIntent) -> Self {
        let value = Some(system_intent.payload.to_value());
        let (input_value_data, input_value_spec) = match system_intent.payload {
            SystemIntentPayload::Data(_) => (value, None),
            SystemIntentPayload::Spec(_) => (None, value),
        };
        Self {
            intent: system_intent.intent.clone(),
            input_value_data,
            input_value_spec,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_response: Option<SimpleResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rich_response: Option<RichResponse>,
}

impl FinalResponse {
    pub fn speech(speech: SimpleResponse) -> Self {
        Self {
            speech_response: Some(speech),
            rich_response: None,
        }
    }

    pub fn rich(rich: RichResponse) -> Self {
        Self {
            speech_response: None,
            rich_response: Some(rich),
        }
    }
}
