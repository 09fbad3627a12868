//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors raised while building protocol values.
///
/// The conversation adapter never surfaces these to callers directly; it
/// routes their message through its error channel and answers the turn
/// with a 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i32,
        max: i32,
        actual: i32,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{what} requires at least {min} items")]
    TooFewItems { what: String, min: usize },

    #[error("{what} can only contain one {item}")]
    DuplicateItem { what: String, item: String },

    #[error("Invalid {what}. {reason}")]
    InvalidStructure { what: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i32, max: i32, actual: i32) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an error for a collection below its minimum size.
    pub fn too_few_items(what: impl Into<String>, min: usize) -> Self {
        ValidationError::TooFewItems {
            what: what.into(),
            min,
        }
    }

    /// Creates an error for a singleton item inserted twice.
    pub fn duplicate_item(what: impl Into<String>, item: impl Into<String>) -> Self {
        ValidationError::DuplicateItem {
            what: what.into(),
            item: item.into(),
        }
    }

    /// Creates an error for a composite value whose parts are out of order
    /// or inconsistent.
    pub fn invalid_structure(what: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidStructure {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    OutOfRange,
    InvalidFormat,

    // Absence errors
    MissingInput,
    MissingRawInput,
    MissingIntent,
    MissingContext,
    NoHandler,

    // Wire errors
    MalformedRequest,
    SerializationFailed,

    // Infrastructure errors
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::MissingInput => "MISSING_INPUT",
            ErrorCode::MissingRawInput => "MISSING_RAW_INPUT",
            ErrorCode::MissingIntent => "MISSING_INTENT",
            ErrorCode::MissingContext => "MISSING_CONTEXT",
            ErrorCode::NoHandler => "NO_HANDLER",
            ErrorCode::MalformedRequest => "MALFORMED_REQUEST",
            ErrorCode::SerializationFailed => "SERIALIZATION_FAILED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            ValidationError::TooFewItems { .. }
            | ValidationError::DuplicateItem { .. }
            | ValidationError::InvalidStructure { .. } => ErrorCode::ValidationFailed,
        };
        DomainError::new(code, err.to_string())
    }
}
