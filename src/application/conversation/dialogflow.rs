//! Conversation over the Dialogflow fulfillment protocol.
//!
//! Dialog state rides in the hidden `_actions_on_google_` context. Intent
//! parameters extracted by Dialogflow take precedence over the arguments of
//! the wrapped Assistant request.

use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use super::adapter::{ConversationAdapter, PromptShape};
use super::turn::Turn;
use crate::domain::content::{
    BasicCard, Carousel, ImageDisplayOptions, List, OptionItem, RichResponse, SimpleResponse,
};
use crate::domain::contexts::{Context, ContextStore};
use crate::domain::foundation::DomainError;
use crate::domain::protocol::{ProtocolContext, SourceFormat, VersionResolver};
use crate::domain::request::{ActionRequest, DialogflowRequest, WireEnvelope};
use crate::domain::response::{DialogflowData, DialogflowResponse, GooglePayload};
use crate::domain::system_intent::SystemIntent;
use crate::ports::{ErrorSink, Serializer, SerializerError};

/// Context Dialogflow sets when the user picks a list or carousel item.
const OPTION_CONTEXT: &str = "actions_intent_option";

/// Parameter of [`OPTION_CONTEXT`] holding the selected key.
const OPTION_PARAMETER: &str = "OPTION";

/// A context parameter together with the user's original wording.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextArgument {
    pub value: Value,
    pub original: Option<Value>,
}

#[derive(Debug)]
pub struct DialogflowConversation {
    turn: Turn,
    request: DialogflowRequest,
    contexts: ContextStore,
}

impl DialogflowConversation {
    /// Parses the envelope and restores dialog state from the hidden context.
    ///
    /// # Errors
    ///
    /// `MalformedRequest` when the body is not a fulfillment request.
    pub fn new(envelope: &WireEnvelope, serializer: Arc<dyn Serializer>) -> Result<Self, DomainError> {
        let generation = VersionResolver::resolve_generation(envelope);
        let ctx = ProtocolContext::new(SourceFormat::Dialogflow, generation);
        let request: DialogflowRequest = envelope.parse_body()?;
        let contexts = ContextStore::new(request.result.contexts.clone());

        let mut turn = Turn::new(ctx, envelope, serializer);
        turn.set_dialog_state(contexts.incoming_state());

        debug!(protocol = %ctx, action = ?request.result.action, "dialogflow turn");
        Ok(Self {
            turn,
            request,
            contexts,
        })
    }

    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.turn.set_error_sink(sink);
        self
    }

    pub fn with_legacy_version_echo(mut self, echo: bool) -> Self {
        self.turn.set_echo_legacy_version(echo);
        self
    }

    pub fn request(&self) -> &DialogflowRequest {
        &self.request
    }

    // ────────────────────────────────────────────────────────────────
    // Contexts
    // ────────────────────────────────────────────────────────────────

    /// Sets an outgoing context; lifespan defaults to one turn.
    ///
    /// A blank name fails the turn.
    pub fn set_context(&mut self, name: &str, lifespan: Option<u32>, parameters: Option<Map<String, Value>>) {
        if let Err(e) = self.contexts.set(name, lifespan, parameters) {
            self.turn.handle_error(&e.to_string());
        }
    }

    /// An incoming context by name, ignoring case.
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// Incoming contexts, without the state carrier.
    pub fn contexts(&self) -> Vec<&Context> {
        self.contexts.list()
    }

    /// Reads `argument` from context `context`, with its `<argument>.original`
    /// companion when present.
    pub fn context_argument(&self, context: &str, argument: &str) -> Option<ContextArgument> {
        let context = self.contexts.get(context)?;
        let value = context.parameter(argument)?.clone();
        let original = context.parameter(&format!("{}.original", argument)).cloned();
        Some(ContextArgument { value, original })
    }

    // ────────────────────────────────────────────────────────────────
    // Dialogflow's own response
    // ────────────────────────────────────────────────────────────────

    /// The rich response Dialogflow prepared for the matched intent.
    ///
    /// Simple responses go in first, in message order and subject to the
    /// usual cap; the remaining messages follow in order. Message types other
    /// than simple responses, basic cards, suggestion chips and link-out chips
    /// are skipped.
    pub fn incoming_rich_response(&self) -> RichResponse {
        let messages = &self.request.result.fulfillment.messages;
        let mut rich = RichResponse::new();

        for message in messages.iter().filter(|m| message_type(m) == Some("simple_response")) {
            rich.add_simple_response(SimpleResponse {
                text_to_speech: string_field(message, "textToSpeech"),
                ssml: string_field(message, "ssml"),
                display_text: string_field(message, "displayText"),
            });
        }

        for message in messages {
            match message_type(message) {
                Some("basic_card") => {
                    let fields = pick(message, &["title", "subtitle", "formattedText", "image", "buttons"]);
                    let added = serde_json::from_value::<BasicCard>(fields)
                        .map_err(|e| e.to_string())
                        .and_then(|card| rich.add_basic_card(card).map(|_| ()).map_err(|e| e.to_string()));
                    if let Err(error) = added {
                        warn!(%error, "skipping fulfillment basic card");
                    }
                }
                Some("suggestion_chips") => {
                    let titles: Vec<String> = message
                        .get("suggestions")
                        .and_then(Value::as_array)
                        .map(|chips| chips.iter().filter_map(|c| string_field(c, "title")).collect())
                        .unwrap_or_default();
                    rich.add_suggestions(titles);
                }
                Some("link_out_chip") => {
                    let destination = string_field(message, "destinationName").unwrap_or_default();
                    let url = string_field(message, "url").unwrap_or_default();
                    rich.add_suggestion_link(&destination, &url);
                }
                _ => {}
            }
        }
        rich
    }

    /// The list Dialogflow prepared for the matched intent.
    pub fn incoming_list(&self) -> Option<List> {
        let message = self.first_message("list_card")?;
        let list = List::new(message_items(message, "list_card")?);
        Some(match string_field(message, "title") {
            Some(title) => list.set_title(title),
            None => list,
        })
    }

    /// The carousel Dialogflow prepared for the matched intent.
    pub fn incoming_carousel(&self) -> Option<Carousel> {
        let message = self.first_message("carousel_card")?;
        let carousel = Carousel::new(message_items(message, "carousel_card")?);
        let display = message
            .get("imageDisplayOptions")
            .cloned()
            .map(serde_json::from_value::<ImageDisplayOptions>);
        Some(match display {
            Some(Ok(option)) => carousel.with_image_display(option),
            Some(Err(e)) => {
                warn!(error = %e, "unreadable carousel image display option, ignoring");
                carousel
            }
            None => carousel,
        })
    }

    fn first_message(&self, kind: &str) -> Option<&Value> {
        self.request
            .result
            .fulfillment
            .messages
            .iter()
            .find(|m| message_type(m) == Some(kind))
    }

    // ────────────────────────────────────────────────────────────────
    // Rendering
    // ────────────────────────────────────────────────────────────────

    fn render(
        &self,
        expect_user_response: bool,
        prompt: PromptShape,
        no_inputs: Vec<SimpleResponse>,
        system_intent: Option<&SystemIntent>,
    ) -> Result<Value, DomainError> {
        let (speech, mut google) = match prompt {
            PromptShape::Speech(simple) => (
                simple.speech().unwrap_or_default().to_string(),
                GooglePayload::speech(expect_user_response, simple.is_ssml(), no_inputs),
            ),
            PromptShape::Rich(rich) => (
                rich.first_simple()
                    .and_then(SimpleResponse::speech)
                    .unwrap_or_default()
                    .to_string(),
                GooglePayload::rich(expect_user_response, rich, no_inputs),
            ),
        };
        if let Some(intent) = system_intent {
            google = google.with_system_intent(intent);
        }
        let state = expect_user_response.then(|| self.turn.dialog_state());
        let response = DialogflowResponse {
            speech,
            data: DialogflowData { google },
            context_out: self.contexts.merge_outgoing(state),
        };

        let body = serde_json::to_value(&response)
            .map_err(|e| SerializerError::SerializationFailed(e.to_string()))?;
        Ok(body)
    }
}

fn message_type(message: &Value) -> Option<&str> {
    message.get("type").and_then(Value::as_str)
}

/// Items of a list or carousel message, untruncated.
fn message_items(message: &Value, kind: &str) -> Option<Vec<OptionItem>> {
    let items = message.get("items").cloned().unwrap_or_else(|| json!([]));
    match serde_json::from_value(items) {
        Ok(items) => Some(items),
        Err(e) => {
            warn!(kind, error = %e, "unreadable fulfillment message, ignoring");
            None
        }
    }
}

fn string_field(message: &Value, key: &str) -> Option<String> {
    message.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Copies the listed keys of `message` into a new object.
fn pick(message: &Value, keys: &[&str]) -> Value {
    let picked: Map<String, Value> = keys
        .iter()
        .filter_map(|k| message.get(*k).map(|v| (k.to_string(), v.clone())))
        .collect();
    Value::Object(picked)
}

impl ConversationAdapter for DialogflowConversation {
    fn turn(&self) -> &Turn {
        &self.turn
    }

    fn turn_mut(&mut self) -> &mut Turn {
        &mut self.turn
    }

    fn action_request(&self) -> Option<&ActionRequest> {
        self.request.action_request()
    }

    fn intent(&self) -> Option<&str> {
        self.request.result.action.as_deref()
    }

    fn raw_input(&self) -> Option<&str> {
        self.request.result.resolved_query.as_deref()
    }

    fn argument(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.request.result.parameters.get(name) {
            return Some(value.clone());
        }
        self.arguments().get_common(name).map(|v| v.to_json())
    }

    fn selected_option(&self) -> Option<String> {
        let from_context = self
            .contexts
            .get(OPTION_CONTEXT)
            .and_then(|c| c.parameter(OPTION_PARAMETER))
            .and_then(Value::as_str);
        match from_context {
            Some(key) => Some(key.to_string()),
            None => self.arguments().selected_option().map(str::to_string),
        }
    }

    fn render_ask(
        &self,
        prompt: PromptShape,
        no_inputs: Vec<SimpleResponse>,
        system_intent: Option<&SystemIntent>,
    ) -> Result<Value, DomainError> {
        self.render(true, prompt, no_inputs, system_intent)
    }

    fn render_tell(&self, prompt: PromptShape) -> Result<Value, DomainError> {
        self.render(false, prompt, Vec::new(), None)
    }

    fn as_dialogflow(&self) -> Option<&DialogflowConversation> {
        Some(self)
    }

    fn as_dialogflow_mut(&mut self) -> Option<&mut DialogflowConversation> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::JsonSerializer;
    use crate::domain::content::Prompt;
    use crate::domain::protocol::SupportedPermission;
    use http::StatusCode;

    fn body(contexts: Value, parameters: Value) -> Value {
        json!({
            "id": "ce7295cc-b042-42d8-8d72-14b83597ac1e",
            "timestamp": "2017-10-03T20:40:27.283Z",
            "lang": "en",
            "result": {
                "source": "agent",
                "resolvedQuery": "talk to my test app",
                "action": "input.welcome",
                "actionIncomplete": false,
                "parameters": parameters,
                "contexts": contexts,
                "metadata": {"intentName": "Default Welcome Intent"},
                "fulfillment": {"speech": "", "messages": []},
                "score": 1
            },
            "originalRequest": {
                "source": "google",
                "version": "2",
                "data": {
                    "user": {"userId": "11112226094657824893", "locale": "en-US"},
                    "conversation": {"conversationId": "1507063219021", "type": "NEW"},
                    "inputs": [{
                        "intent": "actions.intent.MAIN",
                        "rawInputs": [{"inputType": "KEYBOARD", "query": "talk to my test app"}],
                        "arguments": [{"name": "number", "textValue": "7"}]
                    }],
                    "surface": {"capabilities": [{"name": "actions.capability.AUDIO_OUTPUT"}]}
                }
            },
            "sessionId": "1507063219021"
        })
    }

    fn conversation(headers: Vec<(&str, &str)>, body: Value) -> DialogflowConversation {
        let envelope = WireEnvelope::new(headers, body);
        DialogflowConversation::new(&envelope, Arc::new(JsonSerializer)).unwrap()
    }

    fn v2(body: Value) -> DialogflowConversation {
        conversation(vec![], body)
    }

    mod asks {
        use super::*;

        #[test]
        fn permission_request_carries_hidden_context() {
            let mut conv = v2(body(json!([]), json!({})));
            let reply = conv
                .ask_for_permissions(
                    "To test",
                    &[SupportedPermission::Name, SupportedPermission::DevicePreciseLocation],
                )
                .unwrap()
                .clone();
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(
                reply.body,
                json!({
                    "speech": "PLACEHOLDER_FOR_PERMISSION",
                    "data": {"google": {
                        "expectUserResponse": true,
                        "isSsml": false,
                        "noInputPrompts": [],
                        "systemIntent": {
                            "intent": "actions.intent.PERMISSION",
                            "data": {
                                "@type": "type.googleapis.com/google.actions.v2.PermissionValueSpec",
                                "optContext": "To test",
                                "permissions": ["NAME", "DEVICE_PRECISE_LOCATION"]
                            }
                        }
                    }},
                    "contextOut": [{
                        "name": "_actions_on_google_",
                        "lifespan": 100,
                        "parameters": {"state": null, "data": {}}
                    }]
                })
            );
        }

        #[test]
        fn developer_contexts_follow_state_context() {
            let mut conv = v2(body(json!([]), json!({})));
            conv.set_context("number", Some(3), Some(json!({"n": 1}).as_object().cloned().unwrap()));
            conv.set_context("plain", None, None);
            conv.data_mut().insert("count".into(), json!(1));
            let reply = conv.ask(Prompt::from("Pick a number"), &[]).unwrap();
            assert_eq!(
                reply.body["contextOut"],
                json!([
                    {"name": "_actions_on_google_", "lifespan": 100,
                     "parameters": {"state": null, "data": {"count": 1}}},
                    {"name": "number", "lifespan": 3, "parameters": {"n": 1}},
                    {"name": "plain", "lifespan": 1}
                ])
            );
        }

        #[test]
        fn state_round_trips_through_context() {
            let contexts = json!([{
                "name": "_actions_on_google_",
                "lifespan": 99,
                "parameters": {"state": "guessing", "data": {"answer": 42}}
            }]);
            let mut conv = v2(body(contexts, json!({})));
            assert_eq!(conv.state(), &json!("guessing"));
            assert_eq!(conv.data().get("answer"), Some(&json!(42)));
            let reply = conv.ask(Prompt::from("Guess again"), &[]).unwrap();
            assert_eq!(
                reply.body["contextOut"][0]["parameters"],
                json!({"state": "guessing", "data": {"answer": 42}})
            );
        }

        #[test]
        fn legacy_request_keeps_camel_case() {
            let mut conv = conversation(vec![("Google-Assistant-API-Version", "v1")], body(json!([]), json!({})));
            let reply = conv
                .ask(Prompt::from("<speak>hi</speak>"), &["hello?"])
                .unwrap();
            assert_eq!(
                reply.body["data"],
                json!({"google": {
                    "expectUserResponse": true,
                    "isSsml": true,
                    "noInputPrompts": [{"ssml": "hello?"}]
                }})
            );
            assert!(reply.body.get("contextOut").is_some());
        }

        #[test]
        fn legacy_list_uses_option_value_spec() {
            use crate::domain::content::{List, OptionItem};

            let mut conv = conversation(vec![("Google-Assistant-API-Version", "v1")], body(json!([]), json!({})));
            let list = List::new(vec![OptionItem::new("one"), OptionItem::new("two")]);
            let reply = conv.ask_with_list(Prompt::from("Pick one"), list).unwrap();
            let system_intent = &reply.body["data"]["google"]["systemIntent"];
            assert_eq!(system_intent["intent"], json!("actions.intent.OPTION"));
            assert_eq!(
                system_intent["spec"]["optionValueSpec"]["listSelect"]["items"]
                    .as_array()
                    .map(Vec::len),
                Some(2)
            );
        }

        #[test]
        fn blank_context_name_fails_turn() {
            let mut conv = v2(body(json!([]), json!({})));
            conv.set_context("  ", None, None);
            assert!(conv.ask(Prompt::from("hi"), &[]).is_none());
            assert_eq!(conv.reply().unwrap().status, StatusCode::BAD_REQUEST);
        }
    }

    mod tells {
        use super::*;

        #[test]
        fn plain_tell_has_no_state_context() {
            let mut conv = v2(body(json!([]), json!({})));
            conv.set_context("bye", None, None);
            let reply = conv.tell(Prompt::from("Goodbye")).unwrap();
            assert_eq!(
                reply.body,
                json!({
                    "speech": "Goodbye",
                    "data": {"google": {"expectUserResponse": false, "isSsml": false, "noInputPrompts": []}},
                    "contextOut": [{"name": "bye", "lifespan": 1}]
                })
            );
        }

        #[test]
        fn rich_tell_speaks_first_simple() {
            let mut rich = RichResponse::new();
            rich.add_speech("Bye now", Some("Bye")).add_suggestions(["Restart"]);
            let mut conv = v2(body(json!([]), json!({})));
            let reply = conv.tell(Prompt::from(rich)).unwrap();
            assert_eq!(reply.body["speech"], json!("Bye now"));
            assert_eq!(
                reply.body["data"]["google"]["richResponse"]["suggestions"],
                json!([{"title": "Restart"}])
            );
            assert!(reply.body["data"]["google"].get("noInputPrompts").is_none());
        }
    }

    mod getters {
        use super::*;

        #[test]
        fn reads_dialogflow_fields() {
            let conv = v2(body(json!([]), json!({"color": "blue"})));
            assert_eq!(conv.intent(), Some("input.welcome"));
            assert_eq!(conv.raw_input(), Some("talk to my test app"));
            assert_eq!(conv.conversation_id(), Some("1507063219021"));
            assert_eq!(conv.user_locale(), Some("en-US"));
        }

        #[test]
        fn parameters_take_precedence_over_arguments() {
            let conv = v2(body(json!([]), json!({"number": "9"})));
            assert_eq!(conv.argument("number"), Some(json!("9")));

            let conv = v2(body(json!([]), json!({})));
            assert_eq!(conv.argument("number"), Some(json!("7")));
            assert_eq!(conv.argument("missing"), None);
        }

        #[test]
        fn contexts_hide_state_and_ignore_case() {
            let contexts = json!([
                {"name": "_actions_on_google_", "lifespan": 99, "parameters": {"state": null, "data": {}}},
                {"name": "Number", "lifespan": 2, "parameters": {"number": "42", "number.original": "forty two"}}
            ]);
            let conv = v2(body(contexts, json!({})));
            assert_eq!(conv.contexts().len(), 1);
            assert!(conv.context("_actions_on_google_").is_none());
            assert_eq!(conv.context("number").unwrap().lifespan, 2);
            assert_eq!(
                conv.context_argument("NUMBER", "number"),
                Some(ContextArgument {
                    value: json!("42"),
                    original: Some(json!("forty two")),
                })
            );
            assert!(conv.context_argument("number", "missing").is_none());
        }

        #[test]
        fn selected_option_prefers_context() {
            let contexts = json!([{"name": "actions_intent_option", "lifespan": 0,
                                   "parameters": {"OPTION": "key_2"}}]);
            let conv = v2(body(contexts, json!({})));
            assert_eq!(conv.selected_option().as_deref(), Some("key_2"));
        }

        #[test]
        fn adapter_downcasts_to_dialogflow() {
            let mut conv = v2(body(json!([]), json!({})));
            let adapter: &mut dyn ConversationAdapter = &mut conv;
            assert!(adapter.as_dialogflow_mut().is_some());
        }
    }

    mod incoming_messages {
        use super::*;

        fn with_messages(messages: Value) -> DialogflowConversation {
            let mut b = body(json!([]), json!({}));
            b["result"]["fulfillment"]["messages"] = messages;
            v2(b)
        }

        #[test]
        fn rich_response_puts_speech_first() {
            let conv = with_messages(json!([
                {"type": "basic_card", "platform": "google", "title": "Title",
                 "formattedText": "Body", "buttons": []},
                {"type": "simple_response", "platform": "google",
                 "textToSpeech": "Hello", "displayText": "Hi"},
                {"type": "suggestion_chips", "platform": "google",
                 "suggestions": [{"title": "one"}, {"title": "two"}]},
                {"type": "link_out_chip", "platform": "google",
                 "destinationName": "Site", "url": "https://example.com"},
                {"type": 0, "speech": "ignored"}
            ]));
            let mut expected = RichResponse::new();
            expected.add_speech("Hello", Some("Hi"));
            expected
                .add_basic_card(crate::domain::content::BasicCard::new().with_title("Title").with_body_text("Body"))
                .unwrap();
            expected
                .add_suggestions(["one", "two"])
                .add_suggestion_link("Site", "https://example.com");
            assert_eq!(conv.incoming_rich_response(), expected);
        }

        #[test]
        fn two_simple_responses_keep_their_order() {
            let conv = with_messages(json!([
                {"type": "simple_response", "platform": "google", "textToSpeech": "first"},
                {"type": "simple_response", "platform": "google", "textToSpeech": "second"}
            ]));
            let rich = conv.incoming_rich_response();
            let speech: Vec<_> = rich
                .items()
                .iter()
                .filter_map(|i| i.as_simple().and_then(SimpleResponse::speech))
                .collect();
            assert_eq!(speech, vec!["first", "second"]);
        }

        #[test]
        fn third_simple_response_is_dropped() {
            let conv = with_messages(json!([
                {"type": "simple_response", "platform": "google", "textToSpeech": "one"},
                {"type": "basic_card", "platform": "google", "title": "Card"},
                {"type": "simple_response", "platform": "google", "textToSpeech": "two"},
                {"type": "simple_response", "platform": "google", "textToSpeech": "three"}
            ]));
            let rich = conv.incoming_rich_response();
            assert_eq!(rich.items().len(), 3);
            assert_eq!(rich.items().iter().filter(|i| i.as_simple().is_some()).count(), 2);
            assert_eq!(rich.items()[1].as_simple().and_then(SimpleResponse::speech), Some("two"));
            assert!(rich.ensure_leading_speech().is_ok());
        }

        #[test]
        fn oversized_list_is_truncated() {
            let items: Vec<Value> = (0..35)
                .map(|n| json!({"optionInfo": {"key": format!("k{n}"), "synonyms": []}, "title": format!("t{n}")}))
                .collect();
            let carousel_items: Vec<Value> = items.iter().take(15).cloned().collect();
            let conv = with_messages(json!([
                {"type": "list_card", "platform": "google", "title": "Many", "items": items},
                {"type": "carousel_card", "platform": "google", "items": carousel_items,
                 "imageDisplayOptions": "CROPPED"}
            ]));
            let list = conv.incoming_list().unwrap();
            assert_eq!(list.items.len(), crate::domain::content::LIST_ITEM_LIMIT);
            assert_eq!(list.items[29].option_info.key, "k29");
            assert_eq!(list.title.as_deref(), Some("Many"));

            let carousel = conv.incoming_carousel().unwrap();
            assert_eq!(carousel.items.len(), crate::domain::content::CAROUSEL_ITEM_LIMIT);
            assert_eq!(
                carousel.image_display_options,
                Some(crate::domain::content::ImageDisplayOptions::Cropped)
            );
        }

        #[test]
        fn list_and_carousel() {
            let item = |key: &str| json!({"optionInfo": {"key": key, "synonyms": []}, "title": key});
            let conv = with_messages(json!([
                {"type": "list_card", "platform": "google", "title": "Pick",
                 "items": [item("a"), item("b")]},
                {"type": "carousel_card", "platform": "google", "items": [item("c"), item("d")]}
            ]));
            let list = conv.incoming_list().unwrap();
            assert_eq!(list.title.as_deref(), Some("Pick"));
            assert_eq!(list.items.len(), 2);
            assert_eq!(conv.incoming_carousel().unwrap().items[0].option_info.key, "c");
        }

        #[test]
        fn absent_messages_are_soft() {
            let conv = with_messages(json!([]));
            assert!(conv.incoming_rich_response().is_empty());
            assert!(conv.incoming_list().is_none());
            assert!(conv.incoming_carousel().is_none());
        }
    }
}
