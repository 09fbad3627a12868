//! The conversation surface shared by both source formats.
//!
//! Implementors supply the format-specific parts (where the request lives,
//! how a reply body is shaped); every ask/tell operation and every request
//! getter is provided on top of those.

use serde_json::{Map, Value};

use super::turn::{Turn, WebhookReply};
use super::DialogflowConversation;
use crate::domain::arguments::ArgumentExtractor;
use crate::domain::content::{Carousel, List, Prompt, RichResponse, SimpleResponse};
use crate::domain::foundation::{DomainError, ValidationError};
use crate::domain::protocol::{
    ApiGeneration, ProtocolContext, SignInStatus, SupportedPermission,
    TransactionRequirementsResult,
};
use crate::domain::request::{
    ActionRequest, Argument, DateTimeValue, InputType, Location, Surface, User, UserProfile,
};
use crate::domain::system_intent::{
    SystemIntent, SystemIntentFactory, TransactionConfig, TriggerFrequency,
};

/// Most no-input reprompts an ask may carry.
pub const MAX_NO_INPUTS: usize = 3;

/// A prompt reduced to the two shapes a reply body distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptShape {
    /// Speech only: text, or a simple response without display text.
    Speech(SimpleResponse),
    /// Anything with visual content.
    Rich(RichResponse),
}

impl From<Prompt> for PromptShape {
    fn from(prompt: Prompt) -> Self {
        match prompt {
            Prompt::Text(text) => PromptShape::Speech(SimpleResponse::new(text)),
            Prompt::Simple(simple) if simple.display_text.is_none() => PromptShape::Speech(simple),
            Prompt::Simple(simple) => PromptShape::Rich(Prompt::Simple(simple).into_rich()),
            Prompt::Rich(rich) => PromptShape::Rich(rich),
        }
    }
}

/// One conversation turn, in either source format.
///
/// Every ask/tell returns the reply it produced, or `None` when the call
/// failed (the failure is then the reply) or the turn was already answered.
pub trait ConversationAdapter: Send {
    // ────────────────────────────────────────────────────────────────
    // Format-specific parts
    // ────────────────────────────────────────────────────────────────

    fn turn(&self) -> &Turn;

    fn turn_mut(&mut self) -> &mut Turn;

    /// The raw Assistant request: the body itself, or the request wrapped by
    /// Dialogflow.
    fn action_request(&self) -> Option<&ActionRequest>;

    /// Name of the intent that triggered this turn.
    fn intent(&self) -> Option<&str>;

    /// What the user said or typed.
    fn raw_input(&self) -> Option<&str>;

    /// Value of a named argument.
    fn argument(&self, name: &str) -> Option<Value>;

    /// Body of a reply that keeps the conversation open.
    fn render_ask(
        &self,
        prompt: PromptShape,
        no_inputs: Vec<SimpleResponse>,
        system_intent: Option<&SystemIntent>,
    ) -> Result<Value, DomainError>;

    /// Body of a reply that ends the conversation.
    fn render_tell(&self, prompt: PromptShape) -> Result<Value, DomainError>;

    fn as_dialogflow(&self) -> Option<&DialogflowConversation> {
        None
    }

    fn as_dialogflow_mut(&mut self) -> Option<&mut DialogflowConversation> {
        None
    }

    // ────────────────────────────────────────────────────────────────
    // Turn state
    // ────────────────────────────────────────────────────────────────

    fn ctx(&self) -> ProtocolContext {
        self.turn().ctx()
    }

    fn generation(&self) -> ApiGeneration {
        self.ctx().generation
    }

    fn reply(&self) -> Option<&WebhookReply> {
        self.turn().reply()
    }

    /// Reports `message` and answers the turn with a 400.
    fn handle_error(&mut self, message: &str) -> Option<&WebhookReply> {
        self.turn_mut().handle_error(message)
    }

    /// Caller state carried from the previous turn.
    fn state(&self) -> &Value {
        &self.turn().dialog_state().state
    }

    fn set_state(&mut self, state: Value) {
        self.turn_mut().set_state_value(state);
    }

    fn data(&self) -> &Map<String, Value> {
        &self.turn().dialog_state().data
    }

    fn data_mut(&mut self) -> &mut Map<String, Value> {
        self.turn_mut().data_mut()
    }

    // ────────────────────────────────────────────────────────────────
    // Replies
    // ────────────────────────────────────────────────────────────────

    /// Asks the user a question, with up to three no-input reprompts.
    ///
    /// Reprompts are sent as SSML exactly when the prompt's speech is SSML.
    fn ask(&mut self, prompt: Prompt, no_inputs: &[&str]) -> Option<&WebhookReply> {
        if !self.turn().is_pending() {
            return None;
        }
        if no_inputs.len() > MAX_NO_INPUTS {
            return self.handle_error("Invalid number of no inputs");
        }
        if prompt.is_empty() {
            return self.handle_error(&ValidationError::empty_field("speech").to_string());
        }
        let ssml = prompt.is_ssml();
        let no_inputs = no_inputs.iter().map(|s| no_input_prompt(s, ssml)).collect();
        let body = self.render_ask(prompt.into(), no_inputs, None);
        finish(self, body)
    }

    /// Ends the conversation.
    fn tell(&mut self, prompt: Prompt) -> Option<&WebhookReply> {
        if !self.turn().is_pending() {
            return None;
        }
        if let Prompt::Rich(rich) = &prompt {
            if let Err(e) = rich.ensure_leading_speech() {
                return self.handle_error(&e.to_string());
            }
        } else if prompt.is_empty() {
            return self.handle_error(&ValidationError::empty_field("speech").to_string());
        }
        let body = self.render_tell(prompt.into());
        finish(self, body)
    }

    fn ask_with_list(&mut self, prompt: Prompt, list: List) -> Option<&WebhookReply> {
        let intent = self.factory().list(list);
        ask_for(self, intent, Some(prompt))
    }

    fn ask_with_carousel(&mut self, prompt: Prompt, carousel: Carousel) -> Option<&WebhookReply> {
        let intent = self.factory().carousel(carousel);
        ask_for(self, intent, Some(prompt))
    }

    fn ask_for_permissions(
        &mut self,
        context: &str,
        permissions: &[SupportedPermission],
    ) -> Option<&WebhookReply> {
        let intent = self.factory().permissions(context, permissions);
        ask_for(self, intent, None)
    }

    fn ask_for_permission(
        &mut self,
        context: &str,
        permission: SupportedPermission,
    ) -> Option<&WebhookReply> {
        self.ask_for_permissions(context, &[permission])
    }

    fn ask_for_update_permission(
        &mut self,
        intent: &str,
        arguments: Vec<Argument>,
    ) -> Option<&WebhookReply> {
        let intent = self.factory().update_permission(intent, arguments);
        ask_for(self, intent, None)
    }

    fn ask_for_transaction_requirements(
        &mut self,
        config: &TransactionConfig,
    ) -> Option<&WebhookReply> {
        let intent = self.factory().transaction_requirements(config);
        ask_for(self, intent, None)
    }

    fn ask_for_delivery_address(&mut self, reason: &str) -> Option<&WebhookReply> {
        let intent = self.factory().delivery_address(reason);
        ask_for(self, intent, None)
    }

    fn ask_for_transaction_decision(
        &mut self,
        order: Value,
        config: &TransactionConfig,
    ) -> Option<&WebhookReply> {
        let intent = self.factory().transaction_decision(order, config);
        ask_for(self, intent, None)
    }

    fn ask_for_confirmation(&mut self, prompt: Option<&str>) -> Option<&WebhookReply> {
        let intent = Ok(self.factory().confirmation(prompt));
        ask_for(self, intent, None)
    }

    fn ask_for_date_time(
        &mut self,
        initial_prompt: Option<&str>,
        date_prompt: Option<&str>,
        time_prompt: Option<&str>,
    ) -> Option<&WebhookReply> {
        let intent = Ok(self.factory().date_time(initial_prompt, date_prompt, time_prompt));
        ask_for(self, intent, None)
    }

    fn ask_for_sign_in(&mut self) -> Option<&WebhookReply> {
        let intent = Ok(self.factory().sign_in());
        ask_for(self, intent, None)
    }

    fn ask_for_new_surface(
        &mut self,
        context: &str,
        notification_title: &str,
        capabilities: &[&str],
    ) -> Option<&WebhookReply> {
        let intent = self
            .factory()
            .new_surface(context, notification_title, capabilities.iter().copied());
        ask_for(self, intent, None)
    }

    fn ask_to_register_daily_update(
        &mut self,
        intent: &str,
        arguments: Vec<Argument>,
    ) -> Option<&WebhookReply> {
        let intent = self
            .factory()
            .register_update(intent, arguments, TriggerFrequency::Daily);
        ask_for(self, intent, None)
    }

    fn factory(&self) -> SystemIntentFactory {
        SystemIntentFactory::new(self.ctx())
    }

    // ────────────────────────────────────────────────────────────────
    // Request getters
    // ────────────────────────────────────────────────────────────────

    fn arguments(&self) -> ArgumentExtractor<'_> {
        ArgumentExtractor::new(
            self.action_request().and_then(ActionRequest::top_input),
            self.generation(),
        )
    }

    fn user(&self) -> Option<&User> {
        self.action_request()?.user.as_ref()
    }

    fn user_name(&self) -> Option<&UserProfile> {
        self.user()?.profile.as_ref()
    }

    fn user_locale(&self) -> Option<&str> {
        self.user()?.locale.as_deref()
    }

    fn device_location(&self) -> Option<&Location> {
        self.action_request()?.device.as_ref()?.location.as_ref()
    }

    fn conversation_id(&self) -> Option<&str> {
        self.action_request()?
            .conversation
            .as_ref()?
            .conversation_id
            .as_deref()
    }

    fn input_type(&self) -> Option<InputType> {
        let input = self.action_request()?.top_input()?;
        input.raw_inputs.first().map(|raw| raw.input_type)
    }

    fn is_in_sandbox(&self) -> bool {
        self.action_request().map(|r| r.is_in_sandbox).unwrap_or(false)
    }

    fn surface_capabilities(&self) -> Vec<&str> {
        self.action_request()
            .and_then(|r| r.surface.as_ref())
            .map(|s| s.capabilities.iter().map(|c| c.name.as_str()).collect())
            .unwrap_or_default()
    }

    fn has_surface_capability(&self, capability: &str) -> bool {
        self.action_request()
            .and_then(|r| r.surface.as_ref())
            .map(|s| s.has_capability(capability))
            .unwrap_or(false)
    }

    fn available_surfaces(&self) -> &[Surface] {
        self.action_request()
            .map(|r| r.available_surfaces.as_slice())
            .unwrap_or(&[])
    }

    /// True when some other surface of the user has every capability.
    fn has_available_surface_capabilities(&self, capabilities: &[&str]) -> bool {
        self.available_surfaces()
            .iter()
            .any(|s| capabilities.iter().all(|c| s.has_capability(c)))
    }

    fn is_permission_granted(&self) -> bool {
        self.arguments().is_permission_granted()
    }

    fn sign_in_status(&self) -> SignInStatus {
        self.arguments().sign_in_status()
    }

    fn transaction_requirements_result(&self) -> Option<TransactionRequirementsResult> {
        self.arguments().transaction_requirements_result()
    }

    fn delivery_address(&self) -> Option<&Value> {
        self.arguments().delivery_address()
    }

    fn transaction_decision(&self) -> Option<&Value> {
        self.arguments().transaction_decision()
    }

    fn user_confirmation(&self) -> Option<bool> {
        self.arguments().user_confirmation()
    }

    fn date_time(&self) -> Option<DateTimeValue> {
        self.arguments().date_time()
    }

    fn is_new_surface(&self) -> bool {
        self.arguments().is_new_surface()
    }

    fn is_update_registered(&self) -> bool {
        self.arguments().is_update_registered()
    }

    fn reprompt_count(&self) -> Option<i64> {
        self.arguments().reprompt_count()
    }

    fn is_final_reprompt(&self) -> bool {
        self.arguments().is_final_reprompt()
    }

    /// Key of the option the user picked.
    fn selected_option(&self) -> Option<String> {
        self.arguments().selected_option().map(str::to_string)
    }

    /// Label of the deployed agent version, when the platform sent one.
    fn action_version_label(&self) -> Option<&str> {
        self.turn().version_label()
    }
}

/// A reprompt spoken the same way as the prompt it follows.
fn no_input_prompt(text: &str, ssml: bool) -> SimpleResponse {
    if ssml {
        SimpleResponse {
            ssml: Some(text.to_string()),
            ..Default::default()
        }
    } else {
        SimpleResponse {
            text_to_speech: Some(text.to_string()),
            ..Default::default()
        }
    }
}

/// Emits `body`, or answers with a 400 carrying the error message.
fn finish<A: ConversationAdapter + ?Sized>(
    adapter: &mut A,
    body: Result<Value, DomainError>,
) -> Option<&WebhookReply> {
    match body {
        Ok(body) => adapter.turn_mut().emit(body),
        Err(e) => adapter.handle_error(&e.message),
    }
}

/// Asks with a system intent. The caller's prompt is used for option
/// selection; every other intent speaks its placeholder.
fn ask_for<A: ConversationAdapter + ?Sized>(
    adapter: &mut A,
    intent: Result<SystemIntent, ValidationError>,
    prompt: Option<Prompt>,
) -> Option<&WebhookReply> {
    if !adapter.turn().is_pending() {
        return None;
    }
    let intent = match intent {
        Ok(intent) => intent,
        Err(e) => return adapter.handle_error(&e.to_string()),
    };
    let prompt = match (prompt, intent.placeholder) {
        (Some(prompt), _) => prompt,
        (None, Some(placeholder)) => Prompt::from(placeholder),
        (None, None) => return adapter.handle_error("Missing prompt for system intent"),
    };
    match &prompt {
        Prompt::Rich(rich) => {
            if let Err(e) = rich.ensure_leading_speech() {
                return adapter.handle_error(&e.to_string());
            }
        }
        other if other.is_empty() => {
            return adapter.handle_error(&ValidationError::empty_field("speech").to_string());
        }
        _ => {}
    }
    let body = adapter.render_ask(prompt.into(), Vec::new(), Some(&intent));
    finish(adapter, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_plain_simple_are_speech() {
        assert!(matches!(PromptShape::from(Prompt::from("hi")), PromptShape::Speech(_)));
        assert!(matches!(
            PromptShape::from(Prompt::from(SimpleResponse::new("hi"))),
            PromptShape::Speech(_)
        ));
    }

    #[test]
    fn simple_with_display_text_is_rich() {
        let shape = PromptShape::from(Prompt::from(SimpleResponse::new("hello").with_display_text("hi")));
        match shape {
            PromptShape::Rich(rich) => assert_eq!(rich.items().len(), 1),
            PromptShape::Speech(_) => panic!("expected rich shape"),
        }
    }
}
