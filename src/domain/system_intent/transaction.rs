//! Transaction configuration and the payment/order options derived from it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ValidationError;

/// Tokenization type sent with every Google-provided payment.
pub const PAYMENT_GATEWAY: &str = "PAYMENT_GATEWAY";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOptions {
    pub request_delivery_address: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub customer_info_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationParameters {
    pub tokenization_type: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleProvidedOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenization_parameters: Option<TokenizationParameters>,
    pub supported_card_networks: Vec<String>,
    pub prepaid_card_disallowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionProvidedOptions {
    pub payment_type: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_provided_options: Option<ActionProvidedOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_provided_options: Option<GoogleProvidedOptions>,
}

/// How the user pays and what the order needs.
///
/// An action-provided payment sets `payment_type`; a Google-provided payment
/// sets `card_networks` or `prepaid_card_disallowed`. Setting both is
/// rejected for a transaction decision.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionConfig {
    pub delivery_address_required: bool,
    pub payment_type: Option<String>,
    pub display_name: Option<String>,
    pub card_networks: Vec<String>,
    pub prepaid_card_disallowed: bool,
    pub tokenization_parameters: Option<Value>,
    pub customer_info_options: Vec<String>,
}

impl TransactionConfig {
    /// Payment handled by the action, e.g. `("BANK", "Checking-4773")`.
    pub fn action_payment(payment_type: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            payment_type: Some(payment_type.into()),
            display_name: Some(display_name.into()),
            ..Default::default()
        }
    }

    /// Payment through a card stored with Google.
    pub fn google_payment<I, S>(card_networks: I, prepaid_card_disallowed: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            card_networks: card_networks.into_iter().map(Into::into).collect(),
            prepaid_card_disallowed,
            ..Default::default()
        }
    }

    pub fn with_delivery_address(mut self, required: bool) -> Self {
        self.delivery_address_required = required;
        self
    }

    pub fn with_tokenization_parameters(mut self, parameters: Value) -> Self {
        self.tokenization_parameters = Some(parameters);
        self
    }

    pub fn with_customer_info<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.customer_info_options = properties.into_iter().map(Into::into).collect();
        self
    }

    fn has_action_payment(&self) -> bool {
        self.payment_type
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Card networks or the prepaid restriction select a Google-provided payment.
    fn has_google_payment(&self) -> bool {
        !self.card_networks.is_empty() || self.prepaid_card_disallowed
    }

    fn action_options(&self) -> PaymentOptions {
        PaymentOptions {
            action_provided_options: Some(ActionProvidedOptions {
                payment_type: self.payment_type.clone().unwrap_or_default(),
                display_name: self.display_name.clone().unwrap_or_default(),
            }),
            google_provided_options: None,
        }
    }

    fn google_options(&self) -> PaymentOptions {
        PaymentOptions {
            action_provided_options: None,
            google_provided_options: Some(GoogleProvidedOptions {
                tokenization_parameters: self.tokenization_parameters.clone().map(|parameters| {
                    TokenizationParameters {
                        tokenization_type: PAYMENT_GATEWAY.to_string(),
                        parameters,
                    }
                }),
                supported_card_networks: self.card_networks.clone(),
                prepaid_card_disallowed: self.prepaid_card_disallowed,
            }),
        }
    }

    /// Payment options for a transaction decision, or `None` when no payment
    /// kind is configured.
    ///
    /// # Errors
    ///
    /// `InvalidStructure` when both payment kinds are configured.
    pub fn payment_options(&self) -> Result<Option<PaymentOptions>, ValidationError> {
        match (self.has_action_payment(), self.has_google_payment()) {
            (true, true) => Err(invalid_config()),
            (true, false) => Ok(Some(self.action_options())),
            (false, true) => Ok(Some(self.google_options())),
            (false, false) => Ok(None),
        }
    }

    /// Payment options for a requirements check, where one kind is mandatory.
    /// When both kinds are configured the action-provided payment is used.
    ///
    /// # Errors
    ///
    /// `InvalidStructure` when no payment kind is configured.
    pub fn required_payment_options(&self) -> Result<PaymentOptions, ValidationError> {
        if self.has_action_payment() {
            Ok(self.action_options())
        } else if self.has_google_payment() {
            Ok(self.google_options())
        } else {
            Err(invalid_config())
        }
    }

    /// Order options for a requirements check: only the delivery flag.
    pub fn requirements_order_options(&self) -> Option<OrderOptions> {
        self.delivery_address_required.then(|| OrderOptions {
            request_delivery_address: true,
            customer_info_options: Vec::new(),
        })
    }

    /// Order options for a transaction decision: the delivery flag plus the
    /// customer info properties.
    pub fn decision_order_options(&self) -> Option<OrderOptions> {
        if !self.delivery_address_required && self.customer_info_options.is_empty() {
            return None;
        }
        Some(OrderOptions {
            request_delivery_address: self.delivery_address_required,
            customer_info_options: self.customer_info_options.clone(),
        })
    }
}

fn invalid_config() -> ValidationError {
    ValidationError::invalid_structure(
        "transaction configuration",
        "Must be either an action-provided or a Google-provided payment",
    )
}
