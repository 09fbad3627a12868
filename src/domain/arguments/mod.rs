//! Built-in argument lookup over the turn's top input.
//!
//! Lookups never fail: a missing input list, a missing argument or a
//! payload of the wrong shape all read as absent.

use serde_json::Value;

use crate::domain::protocol::{
    ApiGeneration, BuiltInArgName, SignInStatus, TransactionRequirementsResult,
};
use crate::domain::request::{Argument, DateTimeValue, Input};

/// Value of an argument as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgumentValue<'a> {
    /// The argument's text value (`textValue`, or v1 `text_value`).
    Text(&'a str),
    /// The whole argument, when it carries no text value.
    Raw(&'a Argument),
}

impl<'a> ArgumentValue<'a> {
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            ArgumentValue::Text(text) => Some(text),
            ArgumentValue::Raw(_) => None,
        }
    }

    /// JSON form: a string for text values, the argument object otherwise.
    pub fn to_json(&self) -> Value {
        match self {
            ArgumentValue::Text(text) => Value::String((*text).to_string()),
            ArgumentValue::Raw(argument) => {
                serde_json::to_value(argument).unwrap_or(Value::Null)
            }
        }
    }
}

/// Finds arguments on the top input of a turn.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentExtractor<'a> {
    arguments: &'a [Argument],
    generation: ApiGeneration,
}

impl<'a> ArgumentExtractor<'a> {
    pub fn new(top_input: Option<&'a Input>, generation: ApiGeneration) -> Self {
        Self {
            arguments: top_input.map(|i| i.arguments.as_slice()).unwrap_or(&[]),
            generation,
        }
    }

    /// First argument whose name matches any candidate.
    pub fn find(&self, candidates: &[&str]) -> Option<&'a Argument> {
        self.arguments
            .iter()
            .find(|arg| candidates.iter().any(|c| *c == arg.name))
    }

    /// A built-in argument under its generation-specific name.
    pub fn built_in(&self, name: BuiltInArgName) -> Option<&'a Argument> {
        self.find(&[name.name(self.generation)])
    }

    /// Text value, then legacy text value, then the raw argument.
    pub fn get_common(&self, name: &str) -> Option<ArgumentValue<'a>> {
        let argument = self.find(&[name])?;
        if let Some(text) = argument.text_value.as_deref() {
            return Some(ArgumentValue::Text(text));
        }
        if let Some(text) = argument.legacy_text_value.as_deref() {
            return Some(ArgumentValue::Text(text));
        }
        Some(ArgumentValue::Raw(argument))
    }

    // ────────────────────────────────────────────────────────────────
    // Typed readers
    // ────────────────────────────────────────────────────────────────

    pub fn is_permission_granted(&self) -> bool {
        self.get_common(BuiltInArgName::Permission.name(self.generation))
            .and_then(|v| v.as_text())
            == Some("true")
    }

    pub fn user_confirmation(&self) -> Option<bool> {
        self.built_in(BuiltInArgName::Confirmation)?.bool_value
    }

    pub fn date_time(&self) -> Option<DateTimeValue> {
        self.built_in(BuiltInArgName::DateTime)?.datetime_value
    }

    pub fn sign_in_status(&self) -> SignInStatus {
        self.built_in(BuiltInArgName::SignIn)
            .and_then(Argument::extension_status)
            .map(SignInStatus::parse)
            .unwrap_or(SignInStatus::SignInStatusUnspecified)
    }

    pub fn transaction_requirements_result(&self) -> Option<TransactionRequirementsResult> {
        self.built_in(BuiltInArgName::TransactionRequirementsCheckResult)?
            .extension_field("resultType")
            .map(TransactionRequirementsResult::parse)
    }

    /// The full transaction decision extension (`userDecision`, `order`, ...).
    pub fn transaction_decision(&self) -> Option<&'a Value> {
        self.built_in(BuiltInArgName::TransactionDecisionValue)?
            .extension
            .as_ref()
    }

    /// The delivery location, only when the user accepted sharing it.
    pub fn delivery_address(&self) -> Option<&'a Value> {
        let extension = self
            .built_in(BuiltInArgName::DeliveryAddressValue)?
            .extension
            .as_ref()?;
        if extension.get("userDecision").and_then(Value::as_str) == Some("ACCEPTED") {
            extension.get("location")
        } else {
            None
        }
    }

    pub fn is_new_surface(&self) -> bool {
        self.built_in(BuiltInArgName::NewSurface)
            .and_then(Argument::extension_status)
            == Some("OK")
    }

    pub fn is_update_registered(&self) -> bool {
        self.built_in(BuiltInArgName::RegisterUpdate)
            .and_then(Argument::extension_status)
            == Some("OK")
    }

    /// Number of no-input reprompts so far in a `actions.intent.NO_INPUT` turn.
    pub fn reprompt_count(&self) -> Option<i64> {
        let argument = self.built_in(BuiltInArgName::RepromptCount)?;
        match argument.int_value.as_ref() {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.parse().ok(),
            _ => argument
                .text_value
                .as_deref()
                .and_then(|t| t.parse().ok()),
        }
    }

    pub fn is_final_reprompt(&self) -> bool {
        self.built_in(BuiltInArgName::IsFinalReprompt)
            .map(|a| a.bool_value == Some(true) || a.text_value.as_deref() == Some("true"))
            .unwrap_or(false)
    }

    /// Key of the option picked from a list or carousel.
    pub fn selected_option(&self) -> Option<&'a str> {
        self.get_common(BuiltInArgName::Option.name(self.generation))?
            .as_text()
    }
}
