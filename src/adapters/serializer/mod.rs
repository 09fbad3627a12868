//! Serializer adapters - token encodings for the dialog state.

mod json;

pub use json::JsonSerializer;
