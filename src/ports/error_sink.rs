//! Error Sink Port - Where the conversation adapter reports turn failures.
//!
//! Every validation or absence error raised while answering a turn is
//! handed to exactly one sink, injected when the adapter is built.

/// Port for receiving error messages raised during a turn.
pub trait ErrorSink: Send + Sync {
    /// Report a failure message. Must not panic.
    fn report(&self, message: &str);
}

/// Sink that discards every message. The default when none is injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopErrorSink;

impl ErrorSink for NoopErrorSink {
    fn report(&self, _message: &str) {}
}
