//! Domain layer containing the webhook protocol model and its rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (errors, state machine, timestamps)
//! - `protocol` - Generation/format resolution and fixed wire names
//! - `request` - Inbound envelope and typed request models
//! - `arguments` - Built-in argument lookup and typed readers
//! - `content` - Rich response content and its insertion rules
//! - `system_intent` - Payloads for built-in platform dialogs
//! - `dialog_state` - The `{state, data}` token carried between turns
//! - `contexts` - Dialogflow contexts and the hidden state context
//! - `response` - Outbound wire bodies

pub mod arguments;
pub mod content;
pub mod contexts;
pub mod dialog_state;
pub mod foundation;
pub mod protocol;
pub mod request;
pub mod response;
pub mod system_intent;
