//! Intent dispatch.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::adapter::ConversationAdapter;

/// A fulfillment function for one intent.
pub type IntentHandler = Arc<dyn Fn(&mut dyn ConversationAdapter) + Send + Sync>;

/// Maps intent names to handlers, with an optional fallback.
#[derive(Clone, Default)]
pub struct IntentRouter {
    handlers: HashMap<String, IntentHandler>,
    fallback: Option<IntentHandler>,
}

impl IntentRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `intent`, replacing an earlier registration.
    pub fn on<F>(mut self, intent: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut dyn ConversationAdapter) + Send + Sync + 'static,
    {
        self.handlers.insert(intent.into(), Arc::new(handler));
        self
    }

    /// Handler run when no intent-specific handler matches.
    pub fn fallback<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut dyn ConversationAdapter) + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(handler));
        self
    }

    pub fn handles(&self, intent: &str) -> bool {
        self.handlers.contains_key(intent)
    }

    /// Runs the handler for the turn's intent.
    ///
    /// With no match and no fallback the turn fails.
    pub fn handle(&self, conversation: &mut dyn ConversationAdapter) {
        let intent = conversation.intent().unwrap_or_default().to_string();
        match self.handlers.get(&intent).or(self.fallback.as_ref()) {
            Some(handler) => {
                debug!(intent = %intent, "dispatching intent");
                handler(conversation);
            }
            None => {
                conversation.handle_error(&format!("no matching intent handler for: {}", intent));
            }
        }
    }
}

impl fmt::Debug for IntentRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut intents: Vec<&String> = self.handlers.keys().collect();
        intents.sort();
        f.debug_struct("IntentRouter")
            .field("intents", &intents)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
