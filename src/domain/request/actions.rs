//! Raw conversation request (the Actions SDK body).
//!
//! Field names are the v2 camelCase names; v1 snake_case spellings are
//! accepted through aliases. The argument model keeps `text_value` as its
//! own field because argument readers give it a distinct precedence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{ConversationType, InputType};
use crate::domain::foundation::Timestamp;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub device: Option<Device>,
    #[serde(default)]
    pub surface: Option<Surface>,
    #[serde(default)]
    pub conversation: Option<Conversation>,
    #[serde(default)]
    pub inputs: Vec<Input>,
    #[serde(default, alias = "is_in_sandbox")]
    pub is_in_sandbox: bool,
    #[serde(default, alias = "available_surfaces")]
    pub available_surfaces: Vec<Surface>,
}

impl ActionRequest {
    /// The first input of the turn, the only one currently meaningful.
    pub fn top_input(&self) -> Option<&Input> {
        self.inputs.first()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(default, alias = "conversation_id")]
    pub conversation_id: Option<String>,
    #[serde(default, rename = "type")]
    pub conversation_type: ConversationType,
    #[serde(default, alias = "conversation_token")]
    pub conversation_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default, alias = "raw_inputs")]
    pub raw_inputs: Vec<RawInput>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInput {
    #[serde(default, alias = "input_type")]
    pub input_type: InputType,
    #[serde(default)]
    pub query: Option<String>,
}

/// A built-in or developer argument attached to an input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "raw_text")]
    pub raw_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,
    /// v1 duplicate of `textValue`.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "text_value")]
    pub legacy_text_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "bool_value")]
    pub bool_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "int_value")]
    pub int_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "datetime_value")]
    pub datetime_value: Option<DateTimeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<Value>,
}

impl Argument {
    /// A plain text argument, as sent with update registrations.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text_value: Some(value.into()),
            ..Default::default()
        }
    }

    /// The `status` field of the extension payload, if any.
    pub fn extension_status(&self) -> Option<&str> {
        self.extension_field("status")
    }

    pub fn extension_field(&self, field: &str) -> Option<&str> {
        self.extension.as_ref()?.get(field)?.as_str()
    }
}

/// Date and time the user picked in a date/time dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateTimeValue {
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub time: Option<TimeOfDay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Date {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeOfDay {
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
    #[serde(default)]
    pub nanos: u32,
}

// ════════════════════════════════════════════════════════════════════════════════
// User, device, surface
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default, alias = "access_token")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, alias = "last_seen")]
    pub last_seen: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "display_name")]
    pub display_name: Option<String>,
    #[serde(default, alias = "given_name")]
    pub given_name: Option<String>,
    #[serde(default, alias = "family_name")]
    pub family_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default, alias = "formatted_address")]
    pub formatted_address: Option<String>,
    #[serde(default, alias = "zip_code")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Surface {
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl Surface {
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.iter().any(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_v2_request() {
        let request: ActionRequest = serde_json::from_value(json!({
            "user": {"userId": "11112226094657824893", "locale": "en-US"},
            "conversation": {
                "conversationId": "1494606917128",
                "type": "ACTIVE",
                "conversationToken": "{\"state\":null,\"data\":{}}"
            },
            "inputs": [{
                "intent": "actions.intent.TEXT",
                "rawInputs": [{"inputType": "VOICE", "query": "bye"}],
                "arguments": [{"name": "text", "rawText": "bye", "textValue": "bye"}]
            }],
            "isInSandbox": true
        }))
        .unwrap();

        let conversation = request.conversation.as_ref().unwrap();
        assert_eq!(conversation.conversation_type, ConversationType::Active);
        assert_eq!(conversation.conversation_id.as_deref(), Some("1494606917128"));
        let input = request.top_input().unwrap();
        assert_eq!(input.raw_inputs[0].input_type, InputType::Voice);
        assert_eq!(input.arguments[0].text_value.as_deref(), Some("bye"));
        assert!(request.is_in_sandbox);
    }

    #[test]
    fn parses_v1_snake_case_request() {
        let request: ActionRequest = serde_json::from_value(json!({
            "user": {"user_id": "11112226094657824893"},
            "conversation": {"conversation_id": "1494606917128", "type": 2},
            "inputs": [{
                "intent": "assistant.intent.action.TEXT",
                "raw_inputs": [{"input_type": 2, "query": "bye"}],
                "arguments": [{"name": "text", "raw_text": "bye", "text_value": "bye"}]
            }]
        }))
        .unwrap();

        assert_eq!(
            request.user.as_ref().unwrap().user_id.as_deref(),
            Some("11112226094657824893")
        );
        let input = request.top_input().unwrap();
        assert_eq!(input.raw_inputs[0].input_type, InputType::Voice);
        let argument = &input.arguments[0];
        assert_eq!(argument.text_value, None);
        assert_eq!(argument.legacy_text_value.as_deref(), Some("bye"));
        assert_eq!(argument.raw_text.as_deref(), Some("bye"));
    }

    #[test]
    fn text_argument_serializes_compactly() {
        let arg = Argument::text("intent_name", "intent_value");
        assert_eq!(
            serde_json::to_value(&arg).unwrap(),
            json!({"name": "intent_name", "textValue": "intent_value"})
        );
    }

    #[test]
    fn extension_status_reads_nested_field() {
        let arg: Argument = serde_json::from_value(json!({
            "name": "SIGN_IN",
            "extension": {"@type": "type.googleapis.com/google.actions.v2.SignInValue", "status": "OK"}
        }))
        .unwrap();
        assert_eq!(arg.extension_status(), Some("OK"));
        assert_eq!(arg.extension_field("missing"), None);
    }

    #[test]
    fn surface_capability_lookup() {
        let surface: Surface = serde_json::from_value(json!({
            "capabilities": [{"name": "actions.capability.AUDIO_OUTPUT"}]
        }))
        .unwrap();
        assert!(surface.has_capability("actions.capability.AUDIO_OUTPUT"));
        assert!(!surface.has_capability("actions.capability.SCREEN_OUTPUT"));
    }
}
