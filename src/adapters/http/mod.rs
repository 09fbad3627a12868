//! HTTP adapters - the webhook endpoint and the layers around it.

pub mod webhook;

use std::time::Duration;

use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;

pub use webhook::{webhook_routes, ErrorResponse, WebhookAppState};

/// The full application router: webhook route plus tracing, timeout and
/// body-size layers taken from configuration.
pub fn app_router(state: WebhookAppState, config: &AppConfig) -> Router {
    webhook_routes(&config.webhook.path)
        .layer(RequestBodyLimitLayer::new(config.webhook.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
