//! Webhook endpoint configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Largest request body the endpoint may be configured to accept.
const MAX_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Webhook endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Route the fulfillment endpoint is mounted at
    #[serde(default = "default_path")]
    pub path: String,

    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Echo `Google-Assistant-API-Version` back when the request carried it
    #[serde(default = "default_echo_legacy_version_header")]
    pub echo_legacy_version_header: bool,
}

impl WebhookConfig {
    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.path.starts_with('/') || self.path.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidWebhookPath);
        }
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_BODY_LIMIT {
            return Err(ValidationError::InvalidBodyLimit);
        }
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_body_bytes: default_max_body_bytes(),
            echo_legacy_version_header: default_echo_legacy_version_header(),
        }
    }
}

fn default_path() -> String {
    "/webhook".to_string()
}

fn default_max_body_bytes() -> usize {
    256 * 1024
}

fn default_echo_legacy_version_header() -> bool {
    true
}
