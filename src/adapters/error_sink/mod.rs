//! Error sink adapters.

mod logging;

pub use logging::TracingErrorSink;
