use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_common::Cents;
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------        OrderId        -------------------------------------------------------
/// The opaque public identifier for an order. This is the id that appears in payment-gateway
/// payloads and client responses. It is distinct from both the internal row id and the
/// human-readable tracking number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      OrderStatus      -------------------------------------------------------
/// The order lifecycle status.
///
/// Orders are created in `PaymentPending`. A verified successful gateway callback moves them to
/// `Placed` (exactly once). `Shipped` and `Delivered` are monotonic fulfillment advances and are
/// only reachable from `Placed` and `Shipped` respectively. `Cancelled` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PaymentPending,
    Placed,
    Shipped,
    Delivered,
    Cancelled,
    Failed,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::PaymentPending => "PaymentPending",
            OrderStatus::Placed => "Placed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Failed => "Failed",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid status: {0}")]
pub struct StatusConversionError(String);

impl FromStr for OrderStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PaymentPending" => Ok(Self::PaymentPending),
            "Placed" => Ok(Self::Placed),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            "Failed" => Ok(Self::Failed),
            s => Err(StatusConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl OrderStatus {
    /// The fulfillment predecessor for monotonic advances, if this status is a fulfillment state.
    pub fn fulfillment_predecessor(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Shipped => Some(OrderStatus::Placed),
            OrderStatus::Delivered => Some(OrderStatus::Shipped),
            _ => None,
        }
    }
}

//--------------------------------------     PaymentStatus     -------------------------------------------------------
/// Whether the order has been paid. This field is the single source of truth for "has this been
/// paid" and is only mutated through the conditional settlement update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
        };
        write!(f, "{s}")
    }
}

impl FromStr for PaymentStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            s => Err(StatusConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//--------------------------------------         Item          -------------------------------------------------------
/// A catalog item. The catalog is an external collaborator; the engine only ever reads the
/// current persisted price and stock.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub price: Cents,
    pub stock: i64,
}

//--------------------------------------       CartLine        -------------------------------------------------------
/// One line of a customer's cart. `price_at_add` is a historical snapshot and is advisory only.
/// Authoritative prices are always re-derived from the catalog at checkout time.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: String,
    pub qty: i64,
    pub price_at_add: Cents,
    pub image: Option<String>,
}

//--------------------------------------     ItemSelection     -------------------------------------------------------
/// An (item, quantity) pair submitted for checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSelection {
    pub item_id: String,
    pub qty: i64,
}

impl ItemSelection {
    pub fn new<S: Into<String>>(item_id: S, qty: i64) -> Self {
        Self { item_id: item_id.into(), qty }
    }
}

//--------------------------------------         Order         -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub tracking_number: String,
    pub customer_id: String,
    pub address_id: String,
    pub total_price: Cents,
    pub currency: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub est_delivery: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       OrderItem       -------------------------------------------------------
/// A line item as captured at order-creation time. `unit_price` is the authoritative catalog
/// price at the moment the order was created and never changes afterwards.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub item_id: String,
    pub qty: i64,
    pub unit_price: Cents,
}

//--------------------------------------       NewOrder        -------------------------------------------------------
/// Everything the backend needs to create an order in a single atomic unit.
///
/// The total price is deliberately absent: it is computed inside the creation transaction from
/// persisted item prices so that no client-supplied figure can ever become an order total.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub tracking_number: String,
    pub customer_id: String,
    pub address_id: String,
    pub items: Vec<ItemSelection>,
    /// Optional client-side total for the tolerance cross-check.
    pub client_total: Option<Cents>,
    pub currency: String,
    /// When true, the ordered quantities are removed from the customer's cart in the same
    /// transaction.
    pub clear_cart: bool,
}

//--------------------------------------    CheckoutSummary    -------------------------------------------------------
/// The committed result of a checkout: the durable order record and its captured line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub order: Order,
    pub items: Vec<OrderItem>,
}
