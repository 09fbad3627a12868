//! Builds the "ask for X" system intents in the turn's wire shape.

use serde_json::Value;

use super::transaction::TransactionConfig;
use super::value_spec::{
    AddressOptions, ConfirmationDialogSpec, ConfirmationValueSpec, DateTimeDialogSpec,
    DateTimeValueSpec, DeliveryAddressValueSpec, InputValueSpec, NewSurfaceValueSpec,
    OptionValueSpec, PermissionValueSpec, RegisterUpdateValueSpec, TimeContext,
    TransactionDecisionValueSpec, TransactionRequirementsCheckSpec, TriggerContext,
    TriggerFrequency, UpdatePermissionValueSpec, ValueSpec,
};
use crate::domain::content::{Carousel, List};
use crate::domain::foundation::ValidationError;
use crate::domain::protocol::{ProtocolContext, StandardIntent, SupportedPermission};
use crate::domain::request::Argument;

pub mod placeholders {
    pub const PERMISSION: &str = "PLACEHOLDER_FOR_PERMISSION";
    pub const TXN_REQUIREMENTS: &str = "PLACEHOLDER_FOR_TXN_REQUIREMENTS";
    pub const DELIVERY_ADDRESS: &str = "PLACEHOLDER_FOR_DELIVERY_ADDRESS";
    pub const TXN_DECISION: &str = "PLACEHOLDER_FOR_TXN_DECISION";
    pub const CONFIRMATION: &str = "PLACEHOLDER_FOR_CONFIRMATION";
    pub const DATETIME: &str = "PLACEHOLDER_FOR_DATETIME";
    pub const SIGN_IN: &str = "PLACEHOLDER_FOR_SIGN_IN";
    pub const NEW_SURFACE: &str = "PLACEHOLDER_FOR_NEW_SURFACE";
    pub const REGISTER_UPDATE: &str = "PLACEHOLDER_FOR_REGISTER_UPDATE";
}

/// Payload of a system intent in one of its two encodings.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemIntentPayload {
    /// Flat `@type`-tagged object (v2, and every capability without a v1 form).
    Data(ValueSpec),
    /// Named-field wrapper (v1 permission and option requests).
    Spec(InputValueSpec),
}

impl SystemIntentPayload {
    /// Key of the payload inside an Actions SDK expected intent.
    pub fn actions_sdk_key(&self) -> &'static str {
        match self {
            SystemIntentPayload::Data(_) => "inputValueData",
            SystemIntentPayload::Spec(_) => "inputValueSpec",
        }
    }

    /// Key of the payload inside a Dialogflow `systemIntent`.
    pub fn dialogflow_key(&self) -> &'static str {
        match self {
            SystemIntentPayload::Data(_) => "data",
            SystemIntentPayload::Spec(_) => "spec",
        }
    }

    pub fn to_value(&self) -> Value {
        let value = match self {
            SystemIntentPayload::Data(spec) => serde_json::to_value(spec),
            SystemIntentPayload::Spec(spec) => serde_json::to_value(spec),
        };
        value.unwrap_or(Value::Null)
    }
}

/// A built-in intent the reply asks the platform to run.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemIntent {
    pub intent: String,
    pub payload: SystemIntentPayload,
    /// Speech sent in place of a prompt; the platform supplies the real one.
    /// `None` for option selection, which carries the caller's prompt.
    pub placeholder: Option<&'static str>,
}

/// Builds system intents for one turn.
#[derive(Debug, Clone, Copy)]
pub struct SystemIntentFactory {
    ctx: ProtocolContext,
}

impl SystemIntentFactory {
    pub fn new(ctx: ProtocolContext) -> Self {
        Self { ctx }
    }

    fn intent(&self, intent: StandardIntent) -> String {
        intent.name(self.ctx.generation).to_string()
    }

    fn data(&self, intent: StandardIntent, spec: ValueSpec, placeholder: &'static str) -> SystemIntent {
        SystemIntent {
            intent: self.intent(intent),
            payload: SystemIntentPayload::Data(spec),
            placeholder: Some(placeholder),
        }
    }

    fn permission_intent(&self, spec: PermissionValueSpec) -> SystemIntent {
        let payload = if self.ctx.is_legacy() {
            SystemIntentPayload::Spec(InputValueSpec {
                permission_value_spec: Some(spec),
                option_value_spec: None,
            })
        } else {
            SystemIntentPayload::Data(ValueSpec::Permission(spec))
        };
        SystemIntent {
            intent: self.intent(StandardIntent::Permission),
            payload,
            placeholder: Some(placeholders::PERMISSION),
        }
    }

    /// Asks for one or more user permissions.
    ///
    /// # Errors
    ///
    /// `EmptyField` for a blank context or an empty permission list,
    /// `InvalidFormat` for the update permission.
    pub fn permissions(
        &self,
        context: &str,
        permissions: &[SupportedPermission],
    ) -> Result<SystemIntent, ValidationError> {
        if context.trim().is_empty() {
            return Err(ValidationError::empty_field("permission context"));
        }
        if permissions.is_empty() {
            return Err(ValidationError::empty_field("permissions"));
        }
        if let Some(p) = permissions.iter().find(|p| !p.is_user_requestable()) {
            return Err(ValidationError::invalid_format(
                "permissions",
                format!("'{}' must be requested as an update permission", p),
            ));
        }
        Ok(self.permission_intent(PermissionValueSpec {
            opt_context: Some(context.to_string()),
            permissions: permissions.to_vec(),
            update_permission_value_spec: None,
        }))
    }

    /// Asks permission to push updates for `intent`.
    ///
    /// # Errors
    ///
    /// `EmptyField` for a blank intent name.
    pub fn update_permission(
        &self,
        intent: &str,
        arguments: Vec<Argument>,
    ) -> Result<SystemIntent, ValidationError> {
        if intent.trim().is_empty() {
            return Err(ValidationError::empty_field("update intent"));
        }
        Ok(self.permission_intent(PermissionValueSpec {
            opt_context: None,
            permissions: vec![SupportedPermission::Update],
            update_permission_value_spec: Some(UpdatePermissionValueSpec {
                intent: intent.to_string(),
                arguments,
            }),
        }))
    }

    /// Action-provided payment wins when both kinds are configured.
    ///
    /// # Errors
    ///
    /// `InvalidStructure` when no payment kind is configured.
    pub fn transaction_requirements(
        &self,
        config: &TransactionConfig,
    ) -> Result<SystemIntent, ValidationError> {
        let payment_options = config.required_payment_options()?;
        Ok(self.data(
            StandardIntent::TransactionRequirementsCheck,
            ValueSpec::TransactionRequirementsCheck(TransactionRequirementsCheckSpec {
                order_options: config.requirements_order_options(),
                payment_options: Some(payment_options),
            }),
            placeholders::TXN_REQUIREMENTS,
        ))
    }

    /// # Errors
    ///
    /// `EmptyField` for a blank reason.
    pub fn delivery_address(&self, reason: &str) -> Result<SystemIntent, ValidationError> {
        if reason.trim().is_empty() {
            return Err(ValidationError::empty_field("delivery address reason"));
        }
        Ok(self.data(
            StandardIntent::DeliveryAddress,
            ValueSpec::DeliveryAddress(DeliveryAddressValueSpec {
                address_options: AddressOptions {
                    reason: reason.to_string(),
                },
            }),
            placeholders::DELIVERY_ADDRESS,
        ))
    }

    /// Asks the user to confirm `order`.
    ///
    /// # Errors
    ///
    /// `EmptyField` for a null order, `InvalidStructure` when both payment
    /// kinds are configured.
    pub fn transaction_decision(
        &self,
        order: Value,
        config: &TransactionConfig,
    ) -> Result<SystemIntent, ValidationError> {
        if order.is_null() {
            return Err(ValidationError::empty_field("order"));
        }
        let payment_options = config.payment_options()?;
        Ok(self.data(
            StandardIntent::TransactionDecision,
            ValueSpec::TransactionDecision(TransactionDecisionValueSpec {
                proposed_order: order,
                order_options: config.decision_order_options(),
                payment_options,
            }),
            placeholders::TXN_DECISION,
        ))
    }

    pub fn confirmation(&self, prompt: Option<&str>) -> SystemIntent {
        let dialog_spec = non_blank(prompt).map(|text| ConfirmationDialogSpec {
            request_confirmation_text: text,
        });
        self.data(
            StandardIntent::Confirmation,
            ValueSpec::Confirmation(ConfirmationValueSpec { dialog_spec }),
            placeholders::CONFIRMATION,
        )
    }

    /// Only the prompts given are sent; with none the platform uses its own.
    pub fn date_time(
        &self,
        initial_prompt: Option<&str>,
        date_prompt: Option<&str>,
        time_prompt: Option<&str>,
    ) -> SystemIntent {
        let dialog_spec = DateTimeDialogSpec {
            request_datetime_text: non_blank(initial_prompt),
            request_date_text: non_blank(date_prompt),
            request_time_text: non_blank(time_prompt),
        };
        self.data(
            StandardIntent::DateTime,
            ValueSpec::DateTime(DateTimeValueSpec {
                dialog_spec: (!dialog_spec.is_empty()).then_some(dialog_spec),
            }),
            placeholders::DATETIME,
        )
    }

    pub fn sign_in(&self) -> SystemIntent {
        self.data(StandardIntent::SignIn, ValueSpec::SignIn, placeholders::SIGN_IN)
    }

    /// Hands the conversation to a surface with the given capabilities.
    ///
    /// # Errors
    ///
    /// `EmptyField` for a blank context.
    pub fn new_surface<I, S>(
        &self,
        context: &str,
        notification_title: &str,
        capabilities: I,
    ) -> Result<SystemIntent, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if context.trim().is_empty() {
            return Err(ValidationError::empty_field("new surface context"));
        }
        Ok(self.data(
            StandardIntent::NewSurface,
            ValueSpec::NewSurface(NewSurfaceValueSpec {
                context: context.to_string(),
                notification_title: notification_title.to_string(),
                capabilities: capabilities.into_iter().map(Into::into).collect(),
            }),
            placeholders::NEW_SURFACE,
        ))
    }

    /// # Errors
    ///
    /// `EmptyField` for a blank intent name.
    pub fn register_update(
        &self,
        intent: &str,
        arguments: Vec<Argument>,
        frequency: TriggerFrequency,
    ) -> Result<SystemIntent, ValidationError> {
        if intent.trim().is_empty() {
            return Err(ValidationError::empty_field("update intent"));
        }
        Ok(self.data(
            StandardIntent::RegisterUpdate,
            ValueSpec::RegisterUpdate(RegisterUpdateValueSpec {
                intent: intent.to_string(),
                arguments,
                trigger_context: TriggerContext {
                    time_context: TimeContext { frequency },
                },
            }),
            placeholders::REGISTER_UPDATE,
        ))
    }

    /// # Errors
    ///
    /// `TooFewItems` for a list with fewer than two items.
    pub fn list(&self, list: List) -> Result<SystemIntent, ValidationError> {
        list.ensure_selectable()?;
        Ok(self.option(OptionValueSpec {
            list_select: Some(list),
            carousel_select: None,
        }))
    }

    /// # Errors
    ///
    /// `TooFewItems` for a carousel with fewer than two items.
    pub fn carousel(&self, carousel: Carousel) -> Result<SystemIntent, ValidationError> {
        carousel.ensure_selectable()?;
        Ok(self.option(OptionValueSpec {
            list_select: None,
            carousel_select: Some(carousel),
        }))
    }

    fn option(&self, spec: OptionValueSpec) -> SystemIntent {
        let payload = if self.ctx.is_legacy() {
            SystemIntentPayload::Spec(InputValueSpec {
                permission_value_spec: None,
                option_value_spec: Some(spec),
            })
        } else {
            SystemIntentPayload::Data(ValueSpec::Option(spec))
        };
        SystemIntent {
            intent: self.intent(StandardIntent::Option),
            payload,
            placeholder: None,
        }
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::OptionItem;
    use crate::domain::protocol::{ApiGeneration, SourceFormat};
    use serde_json::json;

    fn v2() -> SystemIntentFactory {
        SystemIntentFactory::new(ProtocolContext::new(SourceFormat::Dialogflow, ApiGeneration::V2))
    }

    fn v1() -> SystemIntentFactory {
        SystemIntentFactory::new(ProtocolContext::new(SourceFormat::ActionsSdk, ApiGeneration::V1))
    }

    fn two_items() -> Vec<OptionItem> {
        vec![
            OptionItem::new("key_1").set_title("Title 1"),
            OptionItem::new("key_2").set_title("Title 2"),
        ]
    }

    mod permissions {
        use super::*;

        #[test]
        fn v2_uses_tagged_data() {
            let intent = v2()
                .permissions(
                    "To test",
                    &[SupportedPermission::Name, SupportedPermission::DevicePreciseLocation],
                )
                .unwrap();
            assert_eq!(intent.intent, "actions.intent.PERMISSION");
            assert_eq!(intent.placeholder, Some(placeholders::PERMISSION));
            assert_eq!(intent.payload.dialogflow_key(), "data");
            assert_eq!(
                intent.payload.to_value(),
                json!({
                    "@type": "type.googleapis.com/google.actions.v2.PermissionValueSpec",
                    "optContext": "To test",
                    "permissions": ["NAME", "DEVICE_PRECISE_LOCATION"]
                })
            );
        }

        #[test]
        fn v1_uses_named_spec() {
            let intent = v1().permissions("To test", &[SupportedPermission::Name]).unwrap();
            assert_eq!(intent.intent, "assistant.intent.action.PERMISSION");
            assert_eq!(intent.payload.actions_sdk_key(), "inputValueSpec");
            assert_eq!(
                intent.payload.to_value(),
                json!({"permissionValueSpec": {"optContext": "To test", "permissions": ["NAME"]}})
            );
        }

        #[test]
        fn rejects_blank_context_and_empty_list() {
            assert!(v2().permissions(" ", &[SupportedPermission::Name]).is_err());
            assert!(v2().permissions("ctx", &[]).is_err());
            assert!(v2().permissions("ctx", &[SupportedPermission::Update]).is_err());
        }

        #[test]
        fn update_permission_carries_intent() {
            let intent = v2()
                .update_permission("show.image", vec![Argument::text("image_to_show", "image_type_1")])
                .unwrap();
            assert_eq!(
                intent.payload.to_value(),
                json!({
                    "@type": "type.googleapis.com/google.actions.v2.PermissionValueSpec",
                    "permissions": ["UPDATE"],
                    "updatePermissionValueSpec": {
                        "intent": "show.image",
                        "arguments": [{"name": "image_to_show", "textValue": "image_type_1"}]
                    }
                })
            );
            assert!(v2().update_permission("", vec![]).is_err());
        }
    }

    mod transactions {
        use super::*;

        #[test]
        fn requirements_with_action_payment() {
            let config = TransactionConfig::action_payment("BANK", "Checking-4773")
                .with_delivery_address(true);
            let intent = v2().transaction_requirements(&config).unwrap();
            assert_eq!(intent.placeholder, Some(placeholders::TXN_REQUIREMENTS));
            assert_eq!(
                intent.payload.to_value(),
                json!({
                    "@type": "type.googleapis.com/google.actions.v2.TransactionRequirementsCheckSpec",
                    "orderOptions": {"requestDeliveryAddress": true},
                    "paymentOptions": {
                        "actionProvidedOptions": {"paymentType": "BANK", "displayName": "Checking-4773"}
                    }
                })
            );
        }

        #[test]
        fn requirements_without_payment_is_rejected() {
            assert!(v2().transaction_requirements(&TransactionConfig::default()).is_err());
        }

        #[test]
        fn requirements_accept_both_payment_kinds() {
            let mut config = TransactionConfig::google_payment(["VISA"], false);
            config.payment_type = Some("BANK".into());
            let value = v2().transaction_requirements(&config).unwrap().payload.to_value();
            assert_eq!(value["paymentOptions"]["actionProvidedOptions"]["paymentType"], json!("BANK"));
            assert!(value["paymentOptions"].get("googleProvidedOptions").is_none());
            assert!(v2().transaction_decision(json!({"id": "o"}), &config).is_err());
        }

        #[test]
        fn decision_passes_order_through() {
            let config = TransactionConfig::google_payment(["VISA"], false)
                .with_delivery_address(true)
                .with_customer_info(["EMAIL"]);
            let intent = v2().transaction_decision(json!({"id": "order_id"}), &config).unwrap();
            let value = intent.payload.to_value();
            assert_eq!(value["proposedOrder"], json!({"id": "order_id"}));
            assert_eq!(
                value["orderOptions"],
                json!({"requestDeliveryAddress": true, "customerInfoOptions": ["EMAIL"]})
            );
            assert_eq!(
                value["paymentOptions"]["googleProvidedOptions"]["supportedCardNetworks"],
                json!(["VISA"])
            );
        }

        #[test]
        fn decision_without_payment_omits_options() {
            let intent = v2()
                .transaction_decision(json!({"id": "o"}), &TransactionConfig::default())
                .unwrap();
            assert_eq!(
                intent.payload.to_value(),
                json!({
                    "@type": "type.googleapis.com/google.actions.v2.TransactionDecisionValueSpec",
                    "proposedOrder": {"id": "o"}
                })
            );
        }

        #[test]
        fn delivery_address_requires_reason() {
            let intent = v2().delivery_address("Reason").unwrap();
            assert_eq!(intent.intent, "actions.intent.DELIVERY_ADDRESS");
            assert_eq!(intent.payload.to_value()["addressOptions"], json!({"reason": "Reason"}));
            assert!(v2().delivery_address("").is_err());
        }
    }

    mod dialogs {
        use super::*;

        #[test]
        fn confirmation_with_and_without_prompt() {
            assert_eq!(
                v2().confirmation(Some("You want to do that?")).payload.to_value(),
                json!({
                    "@type": "type.googleapis.com/google.actions.v2.ConfirmationValueSpec",
                    "dialogSpec": {"requestConfirmationText": "You want to do that?"}
                })
            );
            assert_eq!(
                v2().confirmation(None).payload.to_value(),
                json!({"@type": "type.googleapis.com/google.actions.v2.ConfirmationValueSpec"})
            );
        }

        #[test]
        fn date_time_sends_only_given_prompts() {
            assert_eq!(
                v2().date_time(Some("When do you want to come in?"), None, Some("What time?"))
                    .payload
                    .to_value(),
                json!({
                    "@type": "type.googleapis.com/google.actions.v2.DateTimeValueSpec",
                    "dialogSpec": {
                        "requestDatetimeText": "When do you want to come in?",
                        "requestTimeText": "What time?"
                    }
                })
            );
            assert_eq!(
                v2().date_time(None, None, None).payload.to_value(),
                json!({"@type": "type.googleapis.com/google.actions.v2.DateTimeValueSpec"})
            );
        }

        #[test]
        fn sign_in_has_type_only() {
            let intent = v1().sign_in();
            assert_eq!(intent.intent, "actions.intent.SIGN_IN");
            assert_eq!(intent.payload.actions_sdk_key(), "inputValueData");
            assert_eq!(
                intent.payload.to_value(),
                json!({"@type": "type.googleapis.com/google.actions.v2.SignInValueSpec"})
            );
        }

        #[test]
        fn new_surface_requires_context() {
            let intent = v2()
                .new_surface("Context", "Title", ["actions.capability.SCREEN_OUTPUT"])
                .unwrap();
            assert_eq!(
                intent.payload.to_value(),
                json!({
                    "@type": "type.googleapis.com/google.actions.v2.NewSurfaceValueSpec",
                    "context": "Context",
                    "notificationTitle": "Title",
                    "capabilities": ["actions.capability.SCREEN_OUTPUT"]
                })
            );
            assert!(v2().new_surface("", "Title", Vec::<String>::new()).is_err());
        }

        #[test]
        fn register_update_sets_frequency() {
            let intent = v2()
                .register_update("intent.name", vec![], TriggerFrequency::Daily)
                .unwrap();
            assert_eq!(
                intent.payload.to_value(),
                json!({
                    "@type": "type.googleapis.com/google.actions.v2.RegisterUpdateValueSpec",
                    "intent": "intent.name",
                    "triggerContext": {"timeContext": {"frequency": "DAILY"}}
                })
            );
            assert!(v2().register_update(" ", vec![], TriggerFrequency::Daily).is_err());
        }
    }

    mod options {
        use super::*;

        #[test]
        fn v2_list_select() {
            let intent = v2().list(List::new(two_items()).set_title("List Title")).unwrap();
            assert_eq!(intent.intent, "actions.intent.OPTION");
            assert!(intent.placeholder.is_none());
            let value = intent.payload.to_value();
            assert_eq!(value["@type"], json!("type.googleapis.com/google.actions.v2.OptionValueSpec"));
            assert_eq!(value["listSelect"]["title"], json!("List Title"));
            assert_eq!(value["listSelect"]["items"].as_array().unwrap().len(), 2);
        }

        #[test]
        fn v1_carousel_select() {
            let intent = v1().carousel(Carousel::new(two_items())).unwrap();
            let value = intent.payload.to_value();
            assert!(value.get("@type").is_none());
            assert_eq!(value["optionValueSpec"]["carouselSelect"]["items"][0]["title"], json!("Title 1"));
        }

        #[test]
        fn single_item_is_rejected() {
            let err = v2().list(List::new(two_items()[..1].to_vec())).unwrap_err();
            assert_eq!(err.to_string(), "List requires at least 2 items");
        }
    }
}
