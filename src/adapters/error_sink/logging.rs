//! Error sink that writes turn failures to the log.

use tracing::warn;

use crate::ports::ErrorSink;

/// Reports every turn failure as a `warn` event on the `fulfillment` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, message: &str) {
        warn!(target: "fulfillment", error = message, "conversation turn failed");
    }
}
