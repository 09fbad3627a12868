//! Request module - the inbound envelope and typed request models.

mod actions;
mod dialogflow;
mod envelope;
mod enums;

pub use actions::{
    ActionRequest, Argument, Capability, Conversation, Coordinates, Date, DateTimeValue, Device,
    Input, Location, RawInput, Surface, TimeOfDay, User, UserProfile,
};
pub use dialogflow::{DialogflowRequest, DialogflowResult, Fulfillment, Metadata, OriginalRequest};
pub use envelope::WireEnvelope;
pub use enums::{ConversationType, InputType};
