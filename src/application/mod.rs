//! Application layer - answering conversation turns.
//!
//! Orchestrates the protocol domain for one inbound request: builds the
//! conversation for the detected format, dispatches it to the registered
//! intent handler and holds the single reply of the turn.

pub mod conversation;

pub use conversation::{
    open_conversation, ActionsSdkConversation, ContextArgument, ConversationAdapter,
    ConversationOptions, DialogflowConversation, IntentHandler, IntentRouter, PromptShape, Turn,
    TurnState, WebhookReply,
};
