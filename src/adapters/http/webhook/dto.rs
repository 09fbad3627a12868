//! Response bodies produced by the endpoint itself.
//!
//! Turn replies are passed through as-is; these cover failures that happen
//! before a conversation exists or after it failed to answer.

use serde::Serialize;

use crate::domain::foundation::DomainError;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(error: &DomainError) -> Self {
        let details = (!error.details.is_empty())
            .then(|| serde_json::to_value(&error.details).ok())
            .flatten();
        Self {
            code: error.code.to_string(),
            message: error.message.clone(),
            details,
        }
    }
}
