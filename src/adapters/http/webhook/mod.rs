//! HTTP adapter for the conversation fulfillment endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::ErrorResponse;
pub use handlers::{fulfill, WebhookAppState};
pub use routes::webhook_routes;
