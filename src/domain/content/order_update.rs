//! Order update sent as a structured rich response item.
//!
//! The fixed fields cover what the platform documents; anything else goes
//! through [`OrderUpdate::with_extra`], which is merged into the JSON object
//! at serialization time and ignored by equality.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::card::Button;
use crate::domain::foundation::ValidationError;

// ════════════════════════════════════════════════════════════════════════════════
// Value types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceType {
    Unknown,
    Estimate,
    Actual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStateKind {
    Created,
    Rejected,
    Confirmed,
    Cancelled,
    InTransit,
    Returned,
    Fulfilled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderAction {
    Unknown,
    ViewDetails,
    Modify,
    Cancel,
    Return,
    Exchange,
    Email,
    Call,
    Reorder,
    Review,
}

/// Which of the mutually exclusive order info slots is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderInfoKind {
    Receipt,
    Rejection,
    Cancellation,
    InTransit,
    Fulfillment,
    Return,
}

impl OrderInfoKind {
    pub fn field_name(&self) -> &'static str {
        match self {
            OrderInfoKind::Receipt => "receipt",
            OrderInfoKind::Rejection => "rejectionInfo",
            OrderInfoKind::Cancellation => "cancellationInfo",
            OrderInfoKind::InTransit => "inTransitInfo",
            OrderInfoKind::Fulfillment => "fulfillmentInfo",
            OrderInfoKind::Return => "returnInfo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency_code: String,
    pub units: i64,
    pub nanos: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    #[serde(rename = "type")]
    pub price_type: PriceType,
    pub amount: Money,
}

impl Price {
    pub fn new(price_type: PriceType, currency_code: impl Into<String>, units: i64, nanos: i32) -> Self {
        Self {
            price_type,
            amount: Money {
                currency_code: currency_code.into(),
                units,
                nanos,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderState {
    pub state: OrderStateKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_state: Option<OrderState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl LineItemUpdate {
    fn has_reason(&self) -> bool {
        self.reason
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderManagementAction {
    #[serde(rename = "type")]
    pub action: OrderAction,
    pub button: Button,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNotification {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTime {
    pub seconds: i64,
    pub nanos: i32,
}

/// Order identity: the Google-assigned id or the action's own id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderId {
    Google(String),
    Action(String),
}

// ════════════════════════════════════════════════════════════════════════════════
// OrderUpdate
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub order_id: OrderId,
    pub order_state: Option<OrderState>,
    pub order_management_actions: Vec<OrderManagementAction>,
    pub info: Option<(OrderInfoKind, Value)>,
    pub update_time: Option<UpdateTime>,
    pub total_price: Option<Price>,
    pub line_item_updates: BTreeMap<String, LineItemUpdate>,
    pub user_notification: Option<UserNotification>,
    extra: Vec<(String, Value)>,
}

impl OrderUpdate {
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            order_state: None,
            order_management_actions: Vec::new(),
            info: None,
            update_time: None,
            total_price: None,
            line_item_updates: BTreeMap::new(),
            user_notification: None,
            extra: Vec::new(),
        }
    }

    pub fn for_google_order(id: impl Into<String>) -> Self {
        Self::new(OrderId::Google(id.into()))
    }

    pub fn for_action_order(id: impl Into<String>) -> Self {
        Self::new(OrderId::Action(id.into()))
    }

    pub fn set_order_state(&mut self, state: OrderStateKind, label: impl Into<String>) -> &mut Self {
        self.order_state = Some(OrderState {
            state,
            label: label.into(),
        });
        self
    }

    pub fn set_update_time(&mut self, seconds: i64, nanos: i32) -> &mut Self {
        self.update_time = Some(UpdateTime { seconds, nanos });
        self
    }

    pub fn set_user_notification(&mut self, title: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.user_notification = Some(UserNotification {
            title: title.into(),
            text: text.into(),
        });
        self
    }

    pub fn set_total_price(
        &mut self,
        price_type: PriceType,
        currency_code: impl Into<String>,
        units: i64,
        nanos: i32,
    ) -> &mut Self {
        self.total_price = Some(Price::new(price_type, currency_code, units, nanos));
        self
    }

    pub fn add_order_management_action(
        &mut self,
        action: OrderAction,
        label: impl Into<String>,
        url: impl Into<String>,
    ) -> &mut Self {
        self.order_management_actions.push(OrderManagementAction {
            action,
            button: Button::new(label, url),
        });
        self
    }

    /// Sets the order info. Only one kind is kept; a new one replaces any
    /// previous kind.
    pub fn set_info(&mut self, kind: OrderInfoKind, info: Value) -> &mut Self {
        self.info = Some((kind, info));
        self
    }

    /// Adds a field outside the fixed model. Later entries win over earlier
    /// ones and over fixed fields of the same name.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.push((key.into(), value));
        self
    }

    pub fn extra(&self) -> &[(String, Value)] {
        &self.extra
    }

    /// Sets the price of a line item.
    ///
    /// A new entry needs a non-blank reason. An existing entry keeps its
    /// reason when the new one is blank and takes the new one otherwise; if
    /// neither has a reason the update is refused.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` when no reason is available; the entry is left
    /// unchanged.
    pub fn add_line_item_price_update(
        &mut self,
        item_id: &str,
        price_type: PriceType,
        currency_code: &str,
        units: i64,
        nanos: i32,
        reason: Option<&str>,
    ) -> Result<&mut Self, ValidationError> {
        let reason = reason.filter(|r| !r.trim().is_empty());
        let price = Price::new(price_type, currency_code, units, nanos);

        match self.line_item_updates.get_mut(item_id) {
            Some(existing) => {
                if reason.is_none() && !existing.has_reason() {
                    return Err(ValidationError::empty_field("reason"));
                }
                existing.price = Some(price);
                if let Some(reason) = reason {
                    existing.reason = Some(reason.to_string());
                }
            }
            None => {
                let reason = reason.ok_or_else(|| ValidationError::empty_field("reason"))?;
                self.line_item_updates.insert(
                    item_id.to_string(),
                    LineItemUpdate {
                        price: Some(price),
                        reason: Some(reason.to_string()),
                        ..Default::default()
                    },
                );
            }
        }
        Ok(self)
    }

    /// Sets the state of a line item; a non-blank reason replaces the
    /// existing one.
    pub fn add_line_item_state_update(
        &mut self,
        item_id: &str,
        state: OrderStateKind,
        label: impl Into<String>,
        reason: Option<&str>,
    ) -> &mut Self {
        let entry = self
            .line_item_updates
            .entry(item_id.to_string())
            .or_default();
        entry.order_state = Some(OrderState {
            state,
            label: label.into(),
        });
        if let Some(reason) = reason.filter(|r| !r.trim().is_empty()) {
            entry.reason = Some(reason.to_string());
        }
        self
    }

    fn to_fields<E: serde::ser::Error>(&self) -> Result<Map<String, Value>, E> {
        fn value<T: Serialize, E: serde::ser::Error>(v: &T) -> Result<Value, E> {
            serde_json::to_value(v).map_err(E::custom)
        }

        let mut fields = Map::new();
        match &self.order_id {
            OrderId::Google(id) => fields.insert("googleOrderId".into(), Value::String(id.clone())),
            OrderId::Action(id) => fields.insert("actionOrderId".into(), Value::String(id.clone())),
        };
        if let Some(state) = &self.order_state {
            fields.insert("orderState".into(), value(state)?);
        }
        fields.insert(
            "orderManagementActions".into(),
            value(&self.order_management_actions)?,
        );
        if let Some((kind, info)) = &self.info {
            fields.insert(kind.field_name().into(), info.clone());
        }
        if let Some(time) = &self.update_time {
            fields.insert("updateTime".into(), value(time)?);
        }
        if let Some(price) = &self.total_price {
            fields.insert("totalPrice".into(), value(price)?);
        }
        fields.insert("lineItemUpdates".into(), value(&self.line_item_updates)?);
        if let Some(notification) = &self.user_notification {
            fields.insert("userNotification".into(), value(notification)?);
        }
        for (key, extra) in &self.extra {
            fields.insert(key.clone(), extra.clone());
        }
        Ok(fields)
    }
}

impl PartialEq for OrderUpdate {
    fn eq(&self, other: &Self) -> bool {
        self.order_id == other.order_id
            && self.order_state == other.order_state
            && self.order_management_actions == other.order_management_actions
            && self.info == other.info
            && self.update_time == other.update_time
            && self.total_price == other.total_price
            && self.line_item_updates == other.line_item_updates
            && self.user_notification == other.user_notification
    }
}

impl Serialize for OrderUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.to_fields::<S::Error>()?;
        fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OrderUpdate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let order_id = match (fields.remove("googleOrderId"), fields.remove("actionOrderId")) {
            (Some(Value::String(id)), _) => OrderId::Google(id),
            (_, Some(Value::String(id))) => OrderId::Action(id),
            _ => return Err(D::Error::custom("order update needs googleOrderId or actionOrderId")),
        };

        fn take<T: serde::de::DeserializeOwned, E: Error>(
            fields: &mut Map<String, Value>,
            key: &str,
        ) -> Result<Option<T>, E> {
            fields
                .remove(key)
                .map(|v| serde_json::from_value(v).map_err(E::custom))
                .transpose()
        }

        let mut update = OrderUpdate::new(order_id);
        update.order_state = take(&mut fields, "orderState")?;
        update.order_management_actions =
            take(&mut fields, "orderManagementActions")?.unwrap_or_default();
        update.update_time = take(&mut fields, "updateTime")?;
        update.total_price = take(&mut fields, "totalPrice")?;
        update.line_item_updates = take(&mut fields, "lineItemUpdates")?.unwrap_or_default();
        update.user_notification = take(&mut fields, "userNotification")?;
        for kind in [
            OrderInfoKind::Receipt,
            OrderInfoKind::Rejection,
            OrderInfoKind::Cancellation,
            OrderInfoKind::InTransit,
            OrderInfoKind::Fulfillment,
            OrderInfoKind::Return,
        ] {
            if let Some(info) = fields.remove(kind.field_name()) {
                update.info = Some((kind, info));
            }
        }
        update.extra = fields.into_iter().collect();
        Ok(update)
    }
}
