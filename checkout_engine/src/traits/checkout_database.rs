use thiserror::Error;

use crate::{
    db_types::{CheckoutSummary, NewOrder, Order, OrderId, OrderStatus},
    pricing::PricingRules,
    traits::{CartManagement, ItemCatalog, OrderManagement, Settlement, SettlementResult},
};
use shop_common::Cents;

/// The highest-level backend contract for the checkout engine.
///
/// Implementations must guarantee that [`create_order`](CheckoutDatabase::create_order) is a
/// single atomic unit, and that [`settle_order`](CheckoutDatabase::settle_order) is a
/// compare-and-set update keyed on the current payment status rather than a blind overwrite.
#[allow(async_fn_in_trait)]
pub trait CheckoutDatabase: Clone + ItemCatalog + CartManagement + OrderManagement {
    /// The URL of the backing database.
    fn url(&self) -> &str;

    /// Creates a new order in a single transaction:
    /// * verify the shipping address exists,
    /// * resolve every requested item against the catalog (one consistent snapshot),
    /// * compute the authoritative total via the pricing rules and cross-check any
    ///   client-submitted total,
    /// * persist the order in `{PaymentPending, Pending}` with its captured line items,
    /// * optionally remove the ordered quantities from the customer's cart.
    ///
    /// Any failure rolls the whole unit back: no partial order, no partial cart mutation.
    async fn create_order(&self, order: NewOrder, rules: &PricingRules) -> Result<CheckoutSummary, CheckoutError>;

    /// Conditionally applies a settlement to the order, only if its payment status is still
    /// `Pending`. Orders that have already settled are returned unchanged.
    async fn settle_order(&self, order_id: &OrderId, settlement: Settlement)
        -> Result<SettlementResult, CheckoutError>;

    /// Advances fulfillment (`Placed -> Shipped -> Delivered`), monotonic, conditional on the
    /// expected predecessor status.
    async fn advance_fulfillment(&self, order_id: &OrderId, new_status: OrderStatus) -> Result<Order, CheckoutError>;

    /// Closes the database connection pool.
    async fn close(&mut self) -> Result<(), CheckoutError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Item {0} does not exist")]
    ItemNotFound(String),
    #[error("Address {0} does not exist")]
    AddressNotFound(String),
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Computed total {computed} does not match submitted total {submitted}")]
    PriceMismatch { computed: Cents, submitted: Cents },
    #[error("Tracking number {0} already exists")]
    DuplicateTrackingNumber(String),
    #[error("Order {order_id} may not move from {from} to {to}")]
    IllegalStatusChange { order_id: OrderId, from: OrderStatus, to: OrderStatus },
    #[error("The checkout could not be completed. {0}")]
    TransactionAborted(String),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        CheckoutError::DatabaseError(e.to_string())
    }
}
