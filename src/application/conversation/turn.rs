//! Per-turn response bookkeeping shared by both conversation formats.
//!
//! A turn answers exactly once. The first successful emission or the first
//! reported error fixes the reply; everything after that is a no-op.

use http::StatusCode;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::dialog_state::{DialogState, DialogStateCodec};
use crate::domain::foundation::{StateMachine, ValidationError};
use crate::domain::protocol::names::{
    ACTIONS_API_VERSION_HEADER, AGENT_VERSION_LABEL_HEADER, ASSISTANT_API_VERSION_HEADER,
    CONTENT_TYPE_JSON, ERROR_BODY_PREFIX,
};
use crate::domain::protocol::ProtocolContext;
use crate::domain::request::WireEnvelope;
use crate::ports::{ErrorSink, NoopErrorSink, Serializer};

/// Response lifecycle of one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Nothing sent yet.
    Pending,
    /// A 200 reply was produced.
    Answered,
    /// A 400 reply was produced.
    Rejected,
}

impl StateMachine for TurnState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TurnState::*;
        matches!((self, target), (Pending, Answered) | (Pending, Rejected))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TurnState::*;
        match self {
            Pending => vec![Answered, Rejected],
            Answered | Rejected => vec![],
        }
    }
}

/// The HTTP reply produced for a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookReply {
    pub status: StatusCode,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

/// State shared by both conversation formats for one turn.
pub struct Turn {
    ctx: ProtocolContext,
    state: TurnState,
    reply: Option<WebhookReply>,
    codec: DialogStateCodec,
    error_sink: Arc<dyn ErrorSink>,
    dialog_state: DialogState,
    legacy_version: Option<String>,
    echo_legacy_version: bool,
    version_label: Option<String>,
}

impl Turn {
    pub fn new(ctx: ProtocolContext, envelope: &WireEnvelope, serializer: Arc<dyn Serializer>) -> Self {
        Self {
            ctx,
            state: TurnState::Pending,
            reply: None,
            codec: DialogStateCodec::new(serializer),
            error_sink: Arc::new(NoopErrorSink),
            dialog_state: DialogState::default(),
            legacy_version: envelope.header(ASSISTANT_API_VERSION_HEADER).map(str::to_string),
            echo_legacy_version: true,
            version_label: envelope.header(AGENT_VERSION_LABEL_HEADER).map(str::to_string),
        }
    }

    pub fn set_error_sink(&mut self, sink: Arc<dyn ErrorSink>) {
        self.error_sink = sink;
    }

    pub fn set_echo_legacy_version(&mut self, echo: bool) {
        self.echo_legacy_version = echo;
    }

    pub fn ctx(&self) -> ProtocolContext {
        self.ctx
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == TurnState::Pending
    }

    pub fn codec(&self) -> &DialogStateCodec {
        &self.codec
    }

    pub fn dialog_state(&self) -> &DialogState {
        &self.dialog_state
    }

    pub fn set_dialog_state(&mut self, state: DialogState) {
        self.dialog_state = state;
    }

    pub fn set_state_value(&mut self, state: Value) {
        self.dialog_state.state = state;
    }

    pub fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.dialog_state.data
    }

    pub fn version_label(&self) -> Option<&str> {
        self.version_label.as_deref()
    }

    pub fn reply(&self) -> Option<&WebhookReply> {
        self.reply.as_ref()
    }

    pub fn into_reply(self) -> Option<WebhookReply> {
        self.reply
    }

    /// Stores a 200 reply carrying `body`.
    pub fn emit(&mut self, body: Value) -> Option<&WebhookReply> {
        if !self.advance(TurnState::Answered) {
            return None;
        }
        debug!(protocol = %self.ctx, "turn answered");
        let headers = self.headers();
        self.reply = Some(WebhookReply {
            status: StatusCode::OK,
            headers,
            body,
        });
        self.reply.as_ref()
    }

    /// Reports `message` and stores a 400 reply, unless the turn was already
    /// answered. Always yields no reply to the caller.
    pub fn handle_error(&mut self, message: &str) -> Option<&WebhookReply> {
        if !self.advance(TurnState::Rejected) {
            return None;
        }
        warn!(protocol = %self.ctx, error = message, "turn rejected");
        self.error_sink.report(message);
        let headers = self.headers();
        self.reply = Some(WebhookReply {
            status: StatusCode::BAD_REQUEST,
            headers,
            body: Value::String(format!("{}{}", ERROR_BODY_PREFIX, message)),
        });
        None
    }

    fn advance(&mut self, target: TurnState) -> bool {
        match self.state.transition_to(target) {
            Ok(next) => {
                self.state = next;
                true
            }
            Err(ValidationError::InvalidFormat { reason, .. }) => {
                debug!(reason = %reason, "turn already answered, ignoring");
                false
            }
            Err(_) => false,
        }
    }

    fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string());
        headers.insert(
            ACTIONS_API_VERSION_HEADER.to_string(),
            self.ctx.generation.version_number().to_string(),
        );
        if self.echo_legacy_version {
            if let Some(legacy) = &self.legacy_version {
                headers.insert(ASSISTANT_API_VERSION_HEADER.to_string(), legacy.clone());
            }
        }
        headers
    }
}

impl std::fmt::Debug for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Turn")
            .field("ctx", &self.ctx)
            .field("state", &self.state)
            .field("dialog_state", &self.dialog_state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::JsonSerializer;
    use crate::domain::protocol::{ApiGeneration, SourceFormat};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<String>>,
    }

    impl ErrorSink for RecordingSink {
        fn report(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn turn(headers: Vec<(&str, &str)>, generation: ApiGeneration) -> Turn {
        let envelope = WireEnvelope::new(headers, json!({}));
        Turn::new(
            ProtocolContext::new(SourceFormat::ActionsSdk, generation),
            &envelope,
            Arc::new(JsonSerializer),
        )
    }

    mod state_machine {
        use super::*;

        #[test]
        fn pending_moves_once() {
            assert!(TurnState::Pending.can_transition_to(&TurnState::Answered));
            assert!(TurnState::Pending.can_transition_to(&TurnState::Rejected));
            assert!(TurnState::Answered.is_terminal());
            assert!(TurnState::Rejected.is_terminal());
        }
    }

    mod emission {
        use super::*;

        #[test]
        fn emit_sets_ok_and_version_header() {
            let mut t = turn(vec![], ApiGeneration::V2);
            let reply = t.emit(json!({"a": 1})).unwrap().clone();
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.headers.get("Google-Actions-API-Version").unwrap(), "2");
            assert_eq!(reply.headers.get("Content-Type").unwrap(), "application/json");
            assert!(!reply.headers.contains_key("Google-Assistant-API-Version"));
        }

        #[test]
        fn second_emit_is_ignored() {
            let mut t = turn(vec![], ApiGeneration::V2);
            t.emit(json!("first"));
            assert!(t.emit(json!("second")).is_none());
            assert_eq!(t.reply().unwrap().body, json!("first"));
        }

        #[test]
        fn legacy_header_is_echoed() {
            let mut t = turn(vec![("Google-Assistant-API-Version", "v1")], ApiGeneration::V1);
            let reply = t.emit(json!({})).unwrap();
            assert_eq!(reply.headers.get("Google-Assistant-API-Version").unwrap(), "v1");
            assert_eq!(reply.headers.get("Google-Actions-API-Version").unwrap(), "1");
        }

        #[test]
        fn legacy_echo_can_be_disabled() {
            let mut t = turn(vec![("Google-Assistant-API-Version", "v1")], ApiGeneration::V1);
            t.set_echo_legacy_version(false);
            let reply = t.emit(json!({})).unwrap();
            assert!(!reply.headers.contains_key("Google-Assistant-API-Version"));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn error_sets_bad_request_once() {
            let sink = Arc::new(RecordingSink::default());
            let mut t = turn(vec![], ApiGeneration::V2);
            t.set_error_sink(sink.clone());

            assert!(t.handle_error("boom").is_none());
            assert!(t.handle_error("again").is_none());
            assert!(t.emit(json!({})).is_none());

            let reply = t.reply().unwrap();
            assert_eq!(reply.status, StatusCode::BAD_REQUEST);
            assert_eq!(reply.body, json!("Action Error: boom"));
            assert_eq!(*sink.messages.lock().unwrap(), vec!["boom".to_string()]);
            assert_eq!(t.state(), TurnState::Rejected);
        }

        #[test]
        fn error_after_answer_is_ignored() {
            let sink = Arc::new(RecordingSink::default());
            let mut t = turn(vec![], ApiGeneration::V2);
            t.set_error_sink(sink.clone());
            t.emit(json!({}));
            t.handle_error("late");
            assert_eq!(t.reply().unwrap().status, StatusCode::OK);
            assert!(sink.messages.lock().unwrap().is_empty());
        }
    }
}
