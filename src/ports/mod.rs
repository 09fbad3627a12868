//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the protocol core and the outside world. Adapters implement these ports.
//!
//! - `Serializer` - Encodes/decodes the opaque dialog state token
//! - `ErrorSink` - Receives the error messages raised while answering a turn

mod error_sink;
mod serializer;

pub use error_sink::{ErrorSink, NoopErrorSink};
pub use serializer::{Serializer, SerializerError};
