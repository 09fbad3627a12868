//! Axum router configuration for the fulfillment endpoint.

use axum::{routing::post, Router};

use super::handlers::{fulfill, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
/// - `POST <path>` - Answer one conversation turn
pub fn webhook_routes(path: &str) -> Router<WebhookAppState> {
    Router::new().route(path, post(fulfill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::JsonSerializer;
    use crate::application::conversation::IntentRouter;
    use crate::domain::content::Prompt;
    use crate::ports::NoopErrorSink;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(router: IntentRouter) -> WebhookAppState {
        WebhookAppState::new(Arc::new(JsonSerializer), Arc::new(NoopErrorSink), router)
    }

    fn greeting_router() -> IntentRouter {
        IntentRouter::new().on("actions.intent.MAIN", |c| {
            c.ask(Prompt::from("Hi! Say a number."), &[]);
        })
    }

    fn main_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .header("Google-Actions-API-Version", "2")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn answers_registered_intent() {
        let app = webhook_routes("/webhook").with_state(state(greeting_router()));
        let response = app
            .oneshot(main_request(json!({"inputs": [{"intent": "actions.intent.MAIN"}]})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["google-actions-api-version"], "2");
        let body = body_json(response).await;
        assert_eq!(body["expectUserResponse"], json!(true));
    }

    #[tokio::test]
    async fn unknown_intent_is_bad_request() {
        let app = webhook_routes("/webhook").with_state(state(greeting_router()));
        let response = app
            .oneshot(main_request(json!({"inputs": [{"intent": "actions.intent.TEXT"}]})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!("Action Error: no matching intent handler for: actions.intent.TEXT")
        );
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request() {
        let app = webhook_routes("/webhook").with_state(state(greeting_router()));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .body(Body::from("{oops"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], json!("MALFORMED_REQUEST"));
    }

    #[tokio::test]
    async fn silent_handler_is_server_error() {
        let router = IntentRouter::new().fallback(|_| {});
        let app = webhook_routes("/webhook").with_state(state(router));
        let response = app
            .oneshot(main_request(json!({"inputs": []})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
