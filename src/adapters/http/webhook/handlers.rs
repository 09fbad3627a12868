//! HTTP handler for the fulfillment endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use crate::application::conversation::{
    open_conversation, ConversationOptions, IntentRouter, WebhookReply,
};
use crate::domain::request::WireEnvelope;
use crate::ports::{ErrorSink, Serializer};

use super::dto::ErrorResponse;

// ════════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct WebhookAppState {
    pub serializer: Arc<dyn Serializer>,
    pub error_sink: Arc<dyn ErrorSink>,
    pub router: Arc<IntentRouter>,
    pub echo_legacy_version: bool,
}

impl WebhookAppState {
    pub fn new(
        serializer: Arc<dyn Serializer>,
        error_sink: Arc<dyn ErrorSink>,
        router: IntentRouter,
    ) -> Self {
        Self {
            serializer,
            error_sink,
            router: Arc::new(router),
            echo_legacy_version: true,
        }
    }

    pub fn with_legacy_version_echo(mut self, echo: bool) -> Self {
        self.echo_legacy_version = echo;
        self
    }

    fn conversation_options(&self) -> ConversationOptions {
        ConversationOptions {
            serializer: self.serializer.clone(),
            error_sink: self.error_sink.clone(),
            echo_legacy_version: self.echo_legacy_version,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhook - Answer one conversation turn
pub async fn fulfill(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_pairs = headers.iter().filter_map(|(name, value)| {
        value
            .to_str()
            .ok()
            .map(|value| (name.as_str().to_string(), value.to_string()))
    });

    let envelope = match WireEnvelope::from_bytes(header_pairs, &body) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(error = %e, "rejecting unreadable webhook body");
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&e))).into_response();
        }
    };

    let mut conversation = match open_conversation(&envelope, &state.conversation_options()) {
        Ok(conversation) => conversation,
        Err(e) => {
            debug!(error = %e, "rejecting webhook body of unexpected shape");
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&e))).into_response();
        }
    };

    state.router.handle(conversation.as_mut());

    match conversation.reply() {
        Some(reply) => reply_response(reply),
        None => {
            error!(
                intent = conversation.intent().unwrap_or_default(),
                "fulfillment finished without answering the turn"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Fulfillment produced no response")),
            )
                .into_response()
        }
    }
}

/// Writes a turn reply out as-is: status, headers and JSON body.
fn reply_response(reply: &WebhookReply) -> Response {
    let mut response = (reply.status, Json(reply.body.clone())).into_response();
    for (name, value) in &reply.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => error!(header = %name, "dropping unrepresentable reply header"),
        }
    }
    response
}
