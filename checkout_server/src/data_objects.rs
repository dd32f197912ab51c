use checkout_engine::db_types::{ItemSelection, Order, OrderId, OrderItem, OrderStatus};
use serde::{Deserialize, Serialize};

use crate::payhere::PaymentSession;

/// The checkout payload. The client states what it wants to buy; everything money-related is
/// recomputed server-side. `total_amount` is an optional cross-check figure (the total the
/// customer saw), as a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub address_id: String,
    pub items: Vec<RequestedItem>,
    #[serde(default)]
    pub total_amount: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedItem {
    pub item: String,
    pub qty: i64,
}

impl RequestedItem {
    pub fn to_selection(&self) -> ItemSelection {
        ItemSelection::new(self.item.clone(), self.qty)
    }
}

/// The committed order, its captured line items, and a signed gateway session
/// (`payhere_data`) the client can redirect the customer with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub tracking_number: String,
    pub payhere_data: PaymentSession,
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// A payment notification as posted (form-encoded) by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentNotification {
    pub merchant_id: String,
    pub order_id: String,
    #[serde(default)]
    pub payment_id: Option<String>,
    pub payhere_amount: String,
    pub payhere_currency: String,
    pub status_code: String,
    pub md5sig: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

/// Body for the fulfillment-advance endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentUpdate {
    pub status: OrderStatus,
}

/// Generic acknowledgement body for endpoints that have no richer payload to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self { success: true, message: message.into() }
    }
}
