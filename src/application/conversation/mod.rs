//! Conversation turns - answering one inbound request exactly once.
//!
//! - `ActionsSdkConversation` - raw Assistant requests, state in the token
//! - `DialogflowConversation` - fulfillment requests, state in a context
//! - `IntentRouter` - dispatches a turn to the handler for its intent

mod actions_sdk;
mod adapter;
mod dialogflow;
mod router;
mod turn;

pub use actions_sdk::ActionsSdkConversation;
pub use adapter::{ConversationAdapter, PromptShape, MAX_NO_INPUTS};
pub use dialogflow::{ContextArgument, DialogflowConversation};
pub use router::{IntentHandler, IntentRouter};
pub use turn::{Turn, TurnState, WebhookReply};

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::protocol::{SourceFormat, VersionResolver};
use crate::domain::request::WireEnvelope;
use crate::ports::{ErrorSink, Serializer};

/// Options applied to every conversation built by [`open_conversation`].
#[derive(Clone)]
pub struct ConversationOptions {
    pub serializer: Arc<dyn Serializer>,
    pub error_sink: Arc<dyn ErrorSink>,
    pub echo_legacy_version: bool,
}

/// Builds the conversation matching the envelope's source format.
///
/// # Errors
///
/// `MalformedRequest` when the body does not fit the detected format.
pub fn open_conversation(
    envelope: &WireEnvelope,
    options: &ConversationOptions,
) -> Result<Box<dyn ConversationAdapter>, DomainError> {
    let conversation: Box<dyn ConversationAdapter> = match VersionResolver::resolve_format(envelope.body()) {
        SourceFormat::ActionsSdk => Box::new(
            ActionsSdkConversation::new(envelope, options.serializer.clone())?
                .with_error_sink(options.error_sink.clone())
                .with_legacy_version_echo(options.echo_legacy_version),
        ),
        SourceFormat::Dialogflow => Box::new(
            DialogflowConversation::new(envelope, options.serializer.clone())?
                .with_error_sink(options.error_sink.clone())
                .with_legacy_version_echo(options.echo_legacy_version),
        ),
    };
    Ok(conversation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::JsonSerializer;
    use crate::ports::NoopErrorSink;
    use serde_json::json;

    fn options() -> ConversationOptions {
        ConversationOptions {
            serializer: Arc::new(JsonSerializer),
            error_sink: Arc::new(NoopErrorSink),
            echo_legacy_version: true,
        }
    }

    #[test]
    fn picks_format_from_body() {
        let sdk = WireEnvelope::new(Vec::<(String, String)>::new(), json!({"inputs": []}));
        assert!(open_conversation(&sdk, &options()).unwrap().as_dialogflow().is_none());

        let dialogflow = WireEnvelope::new(Vec::<(String, String)>::new(), json!({"result": {}}));
        assert!(open_conversation(&dialogflow, &options()).unwrap().as_dialogflow().is_some());
    }
}
