//! System intents - requests for built-in platform dialogs.

mod factory;
mod transaction;
mod value_spec;

pub use factory::{placeholders, SystemIntent, SystemIntentFactory, SystemIntentPayload};
pub use transaction::{
    ActionProvidedOptions, GoogleProvidedOptions, OrderOptions, PaymentOptions,
    TokenizationParameters, TransactionConfig, PAYMENT_GATEWAY,
};
pub use value_spec::{
    AddressOptions, ConfirmationDialogSpec, ConfirmationValueSpec, DateTimeDialogSpec,
    DateTimeValueSpec, DeliveryAddressValueSpec, InputValueSpec, NewSurfaceValueSpec,
    OptionValueSpec, PermissionValueSpec, RegisterUpdateValueSpec, TimeContext,
    TransactionDecisionValueSpec, TransactionRequirementsCheckSpec, TriggerContext,
    TriggerFrequency, UpdatePermissionValueSpec, ValueSpec,
};
