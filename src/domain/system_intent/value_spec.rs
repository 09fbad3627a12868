//! Payloads of the built-in system intents.
//!
//! The v2 form is a flat object discriminated by `@type`; the v1 form wraps
//! the permission or option spec under a named field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::transaction::{OrderOptions, PaymentOptions};
use crate::domain::content::{Carousel, List};
use crate::domain::protocol::SupportedPermission;
use crate::domain::request::Argument;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionValueSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_context: Option<String>,
    pub permissions: Vec<SupportedPermission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_permission_value_spec: Option<UpdatePermissionValueSpec>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdatePermissionValueSpec {
    pub intent: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionValueSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_select: Option<List>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carousel_select: Option<Carousel>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequirementsCheckSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_options: Option<OrderOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_options: Option<PaymentOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressOptions {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddressValueSpec {
    pub address_options: AddressOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDecisionValueSpec {
    /// The order as built by the caller; passed through untouched.
    pub proposed_order: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_options: Option<OrderOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_options: Option<PaymentOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationDialogSpec {
    pub request_confirmation_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationValueSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_spec: Option<ConfirmationDialogSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeDialogSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_datetime_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_date_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_time_text: Option<String>,
}

impl DateTimeDialogSpec {
    pub fn is_empty(&self) -> bool {
        self.request_datetime_text.is_none()
            && self.request_date_text.is_none()
            && self.request_time_text.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeValueSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialog_spec: Option<DateTimeDialogSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurfaceValueSpec {
    pub context: String,
    pub notification_title: String,
    pub capabilities: Vec<String>,
}

/// How often a registered update fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerFrequency {
    FrequencyUnspecified,
    #[default]
    Daily,
    Routines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeContext {
    pub frequency: TriggerFrequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerContext {
    pub time_context: TimeContext,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUpdateValueSpec {
    pub intent: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
    pub trigger_context: TriggerContext,
}

/// v2 system intent payload, tagged by `@type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum ValueSpec {
    #[serde(rename = "type.googleapis.com/google.actions.v2.PermissionValueSpec")]
    Permission(PermissionValueSpec),
    #[serde(rename = "type.googleapis.com/google.actions.v2.OptionValueSpec")]
    Option(OptionValueSpec),
    #[serde(rename = "type.googleapis.com/google.actions.v2.TransactionRequirementsCheckSpec")]
    TransactionRequirementsCheck(TransactionRequirementsCheckSpec),
    #[serde(rename = "type.googleapis.com/google.actions.v2.DeliveryAddressValueSpec")]
    DeliveryAddress(DeliveryAddressValueSpec),
    #[serde(rename = "type.googleapis.com/google.actions.v2.TransactionDecisionValueSpec")]
    TransactionDecision(TransactionDecisionValueSpec),
    #[serde(rename = "type.googleapis.com/google.actions.v2.ConfirmationValueSpec")]
    Confirmation(ConfirmationValueSpec),
    #[serde(rename = "type.googleapis.com/google.actions.v2.DateTimeValueSpec")]
    DateTime(DateTimeValueSpec),
    #[serde(rename = "type.googleapis.com/google.actions.v2.SignInValueSpec")]
    SignIn,
    #[serde(rename = "type.googleapis.com/google.actions.v2.NewSurfaceValueSpec")]
    NewSurface(NewSurfaceValueSpec),
    #[serde(rename = "type.googleapis.com/google.actions.v2.RegisterUpdateValueSpec")]
    RegisterUpdate(RegisterUpdateValueSpec),
}

/// v1 system intent payload. Exactly one field is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValueSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_value_spec: Option<PermissionValueSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_value_spec: Option<OptionValueSpec>,
}
