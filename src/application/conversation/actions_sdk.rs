//! Conversation over the raw Actions SDK protocol.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::adapter::{ConversationAdapter, PromptShape};
use super::turn::Turn;
use crate::domain::content::SimpleResponse;
use crate::domain::foundation::DomainError;
use crate::domain::protocol::{ProtocolContext, SourceFormat, VersionResolver};
use crate::domain::request::{ActionRequest, WireEnvelope};
use crate::domain::response::{
    ActionResponse, ExpectedInput, ExpectedIntent, FinalResponse, InputPrompt,
};
use crate::domain::system_intent::SystemIntent;
use crate::ports::{ErrorSink, Serializer, SerializerError};

/// A turn posted directly by the Assistant.
///
/// Dialog state travels in `conversation.conversationToken`.
#[derive(Debug)]
pub struct ActionsSdkConversation {
    turn: Turn,
    request: ActionRequest,
    token_override: Option<Value>,
}

impl ActionsSdkConversation {
    /// Parses the envelope and decodes the incoming dialog state.
    ///
    /// # Errors
    ///
    /// `MalformedRequest` when the body is not a conversation request.
    pub fn new(envelope: &WireEnvelope, serializer: Arc<dyn Serializer>) -> Result<Self, DomainError> {
        let generation = VersionResolver::resolve_generation(envelope);
        let ctx = ProtocolContext::new(SourceFormat::ActionsSdk, generation);
        let request: ActionRequest = envelope.parse_body()?;
        let mut turn = Turn::new(ctx, envelope, serializer);

        let token = request
            .conversation
            .as_ref()
            .and_then(|c| c.conversation_token.as_deref());
        let state = turn.codec().decode(token);
        turn.set_dialog_state(state);

        debug!(protocol = %ctx, intent = ?request.top_input().and_then(|i| i.intent.as_deref()), "actions sdk turn");
        Ok(Self {
            turn,
            request,
            token_override: None,
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

    pub fn request(&self) -> &ActionRequest {
        &self.request
    }

    /// Sends `state` verbatim as the conversation token of the next ask,
    /// instead of the `{state, data}` pair.
    pub fn set_conversation_token_state(&mut self, state: Value) {
        self.token_override = Some(state);
    }

    fn conversation_token(&self) -> Result<String, DomainError> {
        let codec = self.turn.codec();
        let token = match &self.token_override {
            Some(raw) => codec.encode_raw(raw)?,
            None => codec.encode(self.turn.dialog_state())?,
        };
        Ok(token)
    }

    fn finalize(&self, response: ActionResponse) -> Result<Value, DomainError> {
        let body = serde_json::to_value(&response)
            .map_err(|e| SerializerError::SerializationFailed(e.to_string()))?;
        Ok(body)
    }
}

impl ConversationAdapter for ActionsSdkConversation {
    fn turn(&self) -> &Turn {
        &self.turn
    }

    fn turn_mut(&mut self) -> &mut Turn {
        &mut self.turn
    }

    fn action_request(&self) -> Option<&ActionRequest> {
        Some(&self.request)
    }

    fn intent(&self) -> Option<&str> {
        self.request.top_input()?.intent.as_deref()
    }

    fn raw_input(&self) -> Option<&str> {
        self.request
            .top_input()?
            .raw_inputs
            .first()?
            .query
            .as_deref()
    }

    fn argument(&self, name: &str) -> Option<Value> {
        self.arguments().get_common(name).map(|v| v.to_json())
    }

    fn render_ask(
        &self,
        prompt: PromptShape,
        no_inputs: Vec<SimpleResponse>,
        system_intent: Option<&SystemIntent>,
    ) -> Result<Value, DomainError> {
        let input_prompt = match prompt {
            PromptShape::Speech(simple) => InputPrompt::speech(simple, no_inputs),
            PromptShape::Rich(rich) => InputPrompt::rich(rich, no_inputs),
        };
        let possible_intent = match system_intent {
            Some(intent) => ExpectedIntent::from(intent),
            None => ExpectedIntent::text(self.turn.ctx().generation),
        };
        let response = ActionResponse::ask(
            self.conversation_token()?,
            ExpectedInput {
                input_prompt,
                possible_intents: vec![possible_intent],
            },
        );
        self.finalize(response)
    }

    fn render_tell(&self, prompt: PromptShape) -> Result<Value, DomainError> {
        let final_response = match prompt {
            PromptShape::Speech(simple) => FinalResponse::speech(simple),
            PromptShape::Rich(rich) => FinalResponse::rich(rich),
        };
        self.finalize(ActionResponse::tell(final_response))
    }
}
