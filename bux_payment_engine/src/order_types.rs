use std::{fmt::Display, str::FromStr};

use bpg_common::TokenAmount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

//--------------------------------------      OrderId      -----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub i64);

impl OrderId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for OrderId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------      OrderKey     -----------------------------------------------------------
/// The order's secret correlation token, assigned by the order store at checkout. Two keys are
/// equal only if they match byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderKey(pub String);

impl OrderKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OrderKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------   OrderStatusType  ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order is awaiting payment.
    Pending,
    /// The order was flagged for manual review after a rejected notification.
    OnHold,
    /// Payment has been received in full and the payment-complete flag is set.
    Completed,
    /// The payment was cancelled or timed out on the network side.
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::OnHold => write!(f, "OnHold"),
            OrderStatusType::Completed => write!(f, "Completed"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct OrderStatusConversionError(String);

impl FromStr for OrderStatusType {
    type Err = OrderStatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "OnHold" => Ok(Self::OnHold),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(OrderStatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------       Order       -----------------------------------------------------------
/// Read model of an order as held by the external order store. The engine only ever reads these
/// fields; mutations go back through the [`crate::traits::OrderStore`] interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// The customer-facing order number. Usually, but not necessarily, the same as the id.
    pub order_number: String,
    pub order_key: OrderKey,
    pub currency: String,
    pub total: TokenAmount,
    pub shipping_total: TokenAmount,
    pub shipping_tax: TokenAmount,
    pub total_tax: TokenAmount,
    pub status: OrderStatusType,
    pub customer: CustomerInfo,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    CustomerInfo   -----------------------------------------------------------
/// Billing details attached to the order, forwarded to the payment network when the merchant has
/// shipping collection enabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub phone: String,
}

//--------------------------------------     Audit keys    -----------------------------------------------------------
/// Keys of the audit metadata the engine records against an order in the external store.
pub mod meta_keys {
    pub const TRANSACTION_ID: &str = "Transaction ID";
    pub const PAYER_FIRST_NAME: &str = "Payer first name";
    pub const PAYER_LAST_NAME: &str = "Payer last name";
    pub const PAYER_EMAIL: &str = "Payer email";
    /// The idempotency flag. Once set to [`PAYMENT_COMPLETE_VALUE`], the automated flow never
    /// re-enters the completed state, even if the status field is overwritten externally.
    pub const PAYMENT_COMPLETE: &str = "BUX payment complete";
    pub const PAYMENT_COMPLETE_VALUE: &str = "Yes";
}
