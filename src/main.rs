//! Webhook server binary.
//!
//! Serves a small echo conversation: the welcome intent asks for input and
//! every later turn repeats what the user said until they say "bye".

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assistant_webhook::adapters::{app_router, JsonSerializer, TracingErrorSink, WebhookAppState};
use assistant_webhook::application::{ConversationAdapter, IntentRouter};
use assistant_webhook::config::{AppConfig, ServerConfig};
use assistant_webhook::domain::content::Prompt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.server)?;

    let state = WebhookAppState::new(Arc::new(JsonSerializer), Arc::new(TracingErrorSink), echo_router())
        .with_legacy_version_echo(config.webhook.echo_legacy_version_header);
    let app = app_router(state, &config);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, path = %config.webhook.path, environment = ?config.server.environment, "webhook listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(server: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&server.log_level))?;
    let registry = tracing_subscriber::registry().with(env_filter);
    if server.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }
    Ok(())
}

fn echo_router() -> IntentRouter {
    IntentRouter::new()
        .on("actions.intent.MAIN", welcome)
        .on("assistant.intent.action.MAIN", welcome)
        .on("input.welcome", welcome)
        .fallback(echo)
}

fn welcome(conversation: &mut dyn ConversationAdapter) {
    conversation.ask(
        Prompt::from("Hi! Say something and I'll repeat it."),
        &["Say anything.", "I'm still listening.", "Say bye to stop."],
    );
}

fn echo(conversation: &mut dyn ConversationAdapter) {
    let said = conversation.raw_input().unwrap_or_default().to_string();
    if said.trim().eq_ignore_ascii_case("bye") {
        conversation.tell(Prompt::from("Goodbye!"));
        return;
    }
    let turns = conversation
        .data()
        .get("turns")
        .and_then(|v| v.as_u64())
        .unwrap_or(0)
        + 1;
    conversation.data_mut().insert("turns".into(), turns.into());
    conversation.ask(Prompt::from(format!("You said {}", said)), &[]);
}
