//! Dialogflow fulfillment request wrapping the raw conversation request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::actions::ActionRequest;
use crate::domain::contexts::Context;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogflowRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub result: DialogflowResult,
    #[serde(default)]
    pub original_request: Option<OriginalRequest>,
}

impl DialogflowRequest {
    /// The raw conversation request forwarded by the Assistant, if any.
    pub fn action_request(&self) -> Option<&ActionRequest> {
        self.original_request.as_ref()?.data.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogflowResult {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub resolved_query: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub action_incomplete: bool,
    /// Parameters extracted by the matched Dialogflow intent.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub contexts: Vec<Context>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub fulfillment: Fulfillment,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub intent_id: Option<String>,
    #[serde(default)]
    pub intent_name: Option<String>,
    #[serde(default)]
    pub webhook_used: Option<String>,
}

/// The response Dialogflow itself prepared for the matched intent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fulfillment {
    #[serde(default)]
    pub speech: Option<String>,
    #[serde(default)]
    pub messages: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OriginalRequest {
    #[serde(default)]
    pub source: Option<String>,
    /// Either `"2"` or `2` depending on the agent; read by the resolver from
    /// the untyped body.
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub data: Option<ActionRequest>,
}
