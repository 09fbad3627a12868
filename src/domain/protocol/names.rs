//! Fixed protocol names: headers, intents, argument names, permissions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ApiGeneration;
use crate::domain::foundation::ValidationError;

// ════════════════════════════════════════════════════════════════════════════════
// Headers
// ════════════════════════════════════════════════════════════════════════════════

/// Modern version header; carries an integer protocol version.
pub const ACTIONS_API_VERSION_HEADER: &str = "Google-Actions-API-Version";

/// Legacy version header; the literal `v1` marks a v1 request.
pub const ASSISTANT_API_VERSION_HEADER: &str = "Google-Assistant-API-Version";

/// Label of the deployed agent version, sent by Dialogflow.
pub const AGENT_VERSION_LABEL_HEADER: &str = "Agent-Version-Label";

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Prefix of the body written with a 400 response.
pub const ERROR_BODY_PREFIX: &str = "Action Error: ";

// ════════════════════════════════════════════════════════════════════════════════
// Standard intents
// ════════════════════════════════════════════════════════════════════════════════

/// Built-in intents the Assistant can trigger or be asked to trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardIntent {
    Main,
    Text,
    Permission,
    Option,
    TransactionRequirementsCheck,
    DeliveryAddress,
    TransactionDecision,
    Confirmation,
    DateTime,
    SignIn,
    NewSurface,
    RegisterUpdate,
    NoInput,
    Cancel,
}

impl StandardIntent {
    /// Wire name of the intent for the given generation.
    ///
    /// Only the conversation-level intents predate v2; everything else has a
    /// single `actions.intent.*` name.
    pub fn name(&self, generation: ApiGeneration) -> &'static str {
        use StandardIntent::*;
        match (self, generation) {
            (Main, ApiGeneration::V1) => "assistant.intent.action.MAIN",
            (Main, ApiGeneration::V2) => "actions.intent.MAIN",
            (Text, ApiGeneration::V1) => "assistant.intent.action.TEXT",
            (Text, ApiGeneration::V2) => "actions.intent.TEXT",
            (Permission, ApiGeneration::V1) => "assistant.intent.action.PERMISSION",
            (Permission, ApiGeneration::V2) => "actions.intent.PERMISSION",
            (Option, _) => "actions.intent.OPTION",
            (TransactionRequirementsCheck, _) => "actions.intent.TRANSACTION_REQUIREMENTS_CHECK",
            (DeliveryAddress, _) => "actions.intent.DELIVERY_ADDRESS",
            (TransactionDecision, _) => "actions.intent.TRANSACTION_DECISION",
            (Confirmation, _) => "actions.intent.CONFIRMATION",
            (DateTime, _) => "actions.intent.DATETIME",
            (SignIn, _) => "actions.intent.SIGN_IN",
            (NewSurface, _) => "actions.intent.NEW_SURFACE",
            (RegisterUpdate, _) => "actions.intent.REGISTER_UPDATE",
            (NoInput, _) => "actions.intent.NO_INPUT",
            (Cancel, _) => "actions.intent.CANCEL",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Built-in argument names
// ════════════════════════════════════════════════════════════════════════════════

/// Names of the arguments the platform attaches to built-in intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInArgName {
    Permission,
    Option,
    TransactionRequirementsCheckResult,
    DeliveryAddressValue,
    TransactionDecisionValue,
    Confirmation,
    DateTime,
    SignIn,
    NewSurface,
    RegisterUpdate,
    RepromptCount,
    IsFinalReprompt,
}

impl BuiltInArgName {
    pub fn name(&self, generation: ApiGeneration) -> &'static str {
        use BuiltInArgName::*;
        match (self, generation) {
            (Permission, ApiGeneration::V1) => "permission_granted",
            (Permission, ApiGeneration::V2) => "PERMISSION",
            (Option, _) => "OPTION",
            (TransactionRequirementsCheckResult, _) => "TRANSACTION_REQUIREMENTS_CHECK_RESULT",
            (DeliveryAddressValue, _) => "DELIVERY_ADDRESS_VALUE",
            (TransactionDecisionValue, _) => "TRANSACTION_DECISION_VALUE",
            (Confirmation, _) => "CONFIRMATION",
            (DateTime, _) => "DATETIME",
            (SignIn, _) => "SIGN_IN",
            (NewSurface, _) => "NEW_SURFACE",
            (RegisterUpdate, _) => "REGISTER_UPDATE",
            (RepromptCount, _) => "REPROMPT_COUNT",
            (IsFinalReprompt, _) => "IS_FINAL_REPROMPT",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Permissions
// ════════════════════════════════════════════════════════════════════════════════

/// Permissions an action may request from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportedPermission {
    /// The user's full name.
    Name,
    /// Precise device location (coordinates and street address).
    DevicePreciseLocation,
    /// Coarse device location (zip code and city).
    DeviceCoarseLocation,
    /// Permission to send push updates for a given intent.
    Update,
}

impl SupportedPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedPermission::Name => "NAME",
            SupportedPermission::DevicePreciseLocation => "DEVICE_PRECISE_LOCATION",
            SupportedPermission::DeviceCoarseLocation => "DEVICE_COARSE_LOCATION",
            SupportedPermission::Update => "UPDATE",
        }
    }

    /// True for the permissions an app may ask for through a plain
    /// permission request (update permission has its own request).
    pub fn is_user_requestable(&self) -> bool {
        !matches!(self, SupportedPermission::Update)
    }
}

impl fmt::Display for SupportedPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SupportedPermission {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NAME" => Ok(SupportedPermission::Name),
            "DEVICE_PRECISE_LOCATION" => Ok(SupportedPermission::DevicePreciseLocation),
            "DEVICE_COARSE_LOCATION" => Ok(SupportedPermission::DeviceCoarseLocation),
            "UPDATE" => Ok(SupportedPermission::Update),
            other => Err(ValidationError::invalid_format(
                "permission",
                format!("'{}' is not a supported permission", other),
            )),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Dialog status values
// ════════════════════════════════════════════════════════════════════════════════

/// Status reported back after a sign-in request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignInStatus {
    SignInStatusUnspecified,
    Ok,
    Cancelled,
    Error,
}

impl SignInStatus {
    /// Parses the extension status string; unknown values are unspecified.
    pub fn parse(status: &str) -> Self {
        match status {
            "OK" => SignInStatus::Ok,
            "CANCELLED" => SignInStatus::Cancelled,
            "ERROR" => SignInStatus::Error,
            _ => SignInStatus::SignInStatusUnspecified,
        }
    }
}

/// Result of a transaction requirements check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionRequirementsResult {
    ResultTypeUnspecified,
    Ok,
    UserActionRequired,
    AssistantSurfaceNotSupported,
    RegionNotSupported,
}

impl TransactionRequirementsResult {
    pub fn parse(result: &str) -> Self {
        match result {
            "OK" => Self::Ok,
            "USER_ACTION_REQUIRED" => Self::UserActionRequired,
            "ASSISTANT_SURFACE_NOT_SUPPORTED" => Self::AssistantSurfaceNotSupported,
            "REGION_NOT_SUPPORTED" => Self::RegionNotSupported,
            _ => Self::ResultTypeUnspecified,
        }
    }
}

/// Well-known surface capability names.
pub mod capabilities {
    pub const AUDIO_OUTPUT: &str = "actions.capability.AUDIO_OUTPUT";
    pub const SCREEN_OUTPUT: &str = "actions.capability.SCREEN_OUTPUT";
    pub const MEDIA_RESPONSE_AUDIO: &str = "actions.capability.MEDIA_RESPONSE_AUDIO";
    pub const WEB_BROWSER: &str = "actions.capability.WEB_BROWSER";
}
