//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the protocol core to external systems:
//! - `serializer` - JSON encoding of the dialog state token
//! - `error_sink` - Turn failures reported through `tracing`
//! - `http` - The axum webhook endpoint

pub mod error_sink;
pub mod http;
pub mod serializer;

pub use error_sink::TracingErrorSink;
pub use http::{app_router, WebhookAppState};
pub use serializer::JsonSerializer;
