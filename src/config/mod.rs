//! Application configuration module
//!
//! Configuration is loaded from environment variables using the `config` and
//! `dotenvy` crates, with the `ASSISTANT_WEBHOOK` prefix and `__` separating
//! nested values.
//!
//! # Example
//!
//! ```no_run
//! use assistant_webhook::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Webhook listening at {}", config.webhook.path);
//! ```

mod error;
mod server;
mod webhook;

pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use webhook::WebhookConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, timeouts)
    #[serde(default)]
    pub server: ServerConfig,

    /// Webhook endpoint configuration
    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables such as
    /// `ASSISTANT_WEBHOOK__SERVER__PORT=8080` into `server.port`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ASSISTANT_WEBHOOK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.webhook.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
