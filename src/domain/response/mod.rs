//! Response module - outbound wire bodies for both source formats.

mod actions_sdk;
mod dialogflow;

pub use actions_sdk::{ActionResponse, ExpectedInput, ExpectedIntent, FinalResponse, InputPrompt};
pub use dialogflow::{DialogflowData, DialogflowResponse, GooglePayload, SystemIntentOut};
