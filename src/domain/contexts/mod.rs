//! Dialogflow contexts and the hidden state-carrier context.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::dialog_state::DialogState;
use crate::domain::foundation::ValidationError;

/// Name of the context that carries dialog state between turns.
pub const STATE_CONTEXT_NAME: &str = "_actions_on_google_";

/// Lifespan given to the state context on every turn that expects a reply.
pub const STATE_CONTEXT_LIFESPAN: u32 = 100;

/// Lifespan used by `ContextStore::set` when none is given.
pub const DEFAULT_CONTEXT_LIFESPAN: u32 = 1;

/// A named Dialogflow context.
///
/// Two contexts are equal when their names match ignoring case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    #[serde(default)]
    pub lifespan: u32,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

impl Context {
    pub fn new(name: impl Into<String>, lifespan: u32, parameters: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            lifespan,
            parameters,
        }
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn is_state_context(&self) -> bool {
        self.has_name(STATE_CONTEXT_NAME)
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.has_name(&other.name)
    }
}

/// Incoming contexts of the turn plus the contexts set for the reply.
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    incoming: Vec<Context>,
    outgoing: Vec<Context>,
}

impl ContextStore {
    pub fn new(incoming: Vec<Context>) -> Self {
        Self {
            incoming,
            outgoing: Vec::new(),
        }
    }

    /// Sets a context for the reply, replacing any earlier one of the same name.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` for a blank name.
    pub fn set(
        &mut self,
        name: &str,
        lifespan: Option<u32>,
        parameters: Option<Map<String, Value>>,
    ) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("context name"));
        }
        let context = Context::new(
            name,
            lifespan.unwrap_or(DEFAULT_CONTEXT_LIFESPAN),
            parameters.unwrap_or_default(),
        );
        match self.outgoing.iter_mut().find(|c| c.has_name(name)) {
            Some(existing) => *existing = context,
            None => self.outgoing.push(context),
        }
        Ok(())
    }

    /// An incoming context by name. The state context is never returned.
    pub fn get(&self, name: &str) -> Option<&Context> {
        self.incoming
            .iter()
            .find(|c| c.has_name(name) && !c.is_state_context())
    }

    /// Incoming contexts excluding the state context.
    pub fn list(&self) -> Vec<&Context> {
        self.incoming.iter().filter(|c| !c.is_state_context()).collect()
    }

    /// Contexts set for the reply so far.
    pub fn outgoing(&self) -> &[Context] {
        &self.outgoing
    }

    /// Dialog state carried by the incoming state context.
    pub fn incoming_state(&self) -> DialogState {
        self.incoming
            .iter()
            .find(|c| c.is_state_context())
            .map(|c| DialogState::from_parameters(&c.parameters))
            .unwrap_or_default()
    }

    /// The context list for the reply.
    ///
    /// When the turn expects a user response the state context comes first,
    /// followed by the developer contexts in the order they were set.
    pub fn merge_outgoing(&self, state: Option<&DialogState>) -> Vec<Context> {
        let mut contexts = Vec::with_capacity(self.outgoing.len() + 1);
        if let Some(state) = state {
            let parameters = match state.to_value() {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            contexts.push(Context::new(
                STATE_CONTEXT_NAME,
                STATE_CONTEXT_LIFESPAN,
                parameters,
            ));
        }
        contexts.extend(
            self.outgoing
                .iter()
                .filter(|c| !c.is_state_context())
                .cloned(),
        );
        contexts
    }
}
