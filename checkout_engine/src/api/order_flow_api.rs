use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::time::timeout;

use crate::{
    db_types::{CheckoutSummary, ItemSelection, NewOrder, Order, OrderId, OrderItem, OrderStatus},
    events::{EventProducers, OrderAnnulledEvent, OrderCreatedEvent, OrderPaidEvent},
    helpers::{new_order_id, new_tracking_number},
    pricing::PricingRules,
    traits::{CheckoutDatabase, CheckoutError, Settlement, SettlementResult},
};
use shop_common::Cents;

/// Tracking numbers carry a short random suffix, so a collision is possible under load.
/// The insert is retried with fresh identifiers a handful of times before giving up.
const MAX_CHECKOUT_ATTEMPTS: usize = 3;

/// Tuning knobs for the checkout flow. Constructed from server configuration.
#[derive(Debug, Clone)]
pub struct CheckoutPolicy {
    pub rules: PricingRules,
    pub currency: String,
    /// Remove the ordered quantities from the cart inside the checkout transaction.
    pub clear_cart: bool,
    /// Upper bound on the checkout transaction. On expiry the unit is rolled back and the
    /// request fails as a whole.
    pub deadline: Duration,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            rules: PricingRules::default(),
            currency: "LKR".to_string(),
            clear_cart: true,
            deadline: Duration::from_secs(5),
        }
    }
}

/// The primary API for moving orders through their lifecycle:
/// creation at checkout, settlement from verified gateway callbacks, and fulfillment.
pub struct OrderFlowApi<B> {
    db: B,
    policy: CheckoutPolicy,
    producers: EventProducers,
}

impl<B: std::fmt::Debug> std::fmt::Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi ({:?})", self.db)
    }
}

impl<B> OrderFlowApi<B>
where B: CheckoutDatabase
{
    pub fn new(db: B, policy: CheckoutPolicy, producers: EventProducers) -> Self {
        Self { db, policy, producers }
    }

    pub fn policy(&self) -> &CheckoutPolicy {
        &self.policy
    }

    /// Places a new order for the customer.
    ///
    /// The items are re-resolved against the catalog and priced server-side; `client_total`, if
    /// present, is only a cross-check. The persistence unit is atomic and bounded by the policy
    /// deadline. On success the order sits in `{PaymentPending, Pending}` awaiting the gateway.
    pub async fn checkout(
        &self,
        customer_id: &str,
        address_id: &str,
        items: Vec<ItemSelection>,
        client_total: Option<Cents>,
    ) -> Result<CheckoutSummary, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::ValidationError("An order must contain at least one item".to_string()));
        }
        if address_id.trim().is_empty() {
            return Err(CheckoutError::ValidationError("A shipping address is required".to_string()));
        }
        if let Some(bad) = items.iter().find(|i| i.qty <= 0) {
            return Err(CheckoutError::ValidationError(format!(
                "Invalid quantity {} for item {}",
                bad.qty, bad.item_id
            )));
        }
        let mut last_err = None;
        for attempt in 1..=MAX_CHECKOUT_ATTEMPTS {
            // Fresh identifiers on every attempt, since a retry only makes sense if the previous
            // tracking number collided.
            let order = NewOrder {
                order_id: new_order_id(),
                tracking_number: new_tracking_number(),
                customer_id: customer_id.to_string(),
                address_id: address_id.to_string(),
                items: items.clone(),
                client_total,
                currency: self.policy.currency.clone(),
                clear_cart: self.policy.clear_cart,
            };
            let result = timeout(self.policy.deadline, self.db.create_order(order, &self.policy.rules))
                .await
                .map_err(|_| {
                    error!("🛍️ Checkout for customer {customer_id} exceeded the {:?} deadline", self.policy.deadline);
                    CheckoutError::TransactionAborted("The order could not be created in time".to_string())
                })?;
            match result {
                Ok(summary) => {
                    info!(
                        "🛍️ Order {} created for customer {customer_id}. Total: {} {}",
                        summary.order.order_id, summary.order.total_price, summary.order.currency
                    );
                    let event = OrderCreatedEvent::new(summary.order.clone(), summary.items.clone());
                    for producer in &self.producers.order_created_producer {
                        producer.publish_event(event.clone()).await;
                    }
                    return Ok(summary);
                },
                Err(CheckoutError::DuplicateTrackingNumber(tn)) => {
                    warn!("🛍️ Tracking number {tn} collided on attempt {attempt}. Retrying with a fresh one.");
                    last_err = Some(CheckoutError::DuplicateTrackingNumber(tn));
                },
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            CheckoutError::TransactionAborted("Could not allocate a unique tracking number".to_string())
        }))
    }

    /// Applies a settlement decided by a verified gateway callback. Safe to call any number of
    /// times for the same order; only the first call moves the order, and only the first call
    /// emits an event.
    pub async fn settle_order(
        &self,
        order_id: &OrderId,
        settlement: Settlement,
    ) -> Result<SettlementResult, CheckoutError> {
        let result = self.db.settle_order(order_id, settlement).await?;
        if result.was_applied() {
            match settlement {
                Settlement::Paid => {
                    info!("💰️ Order {order_id} is paid");
                    let event = OrderPaidEvent::new(result.order().clone());
                    for producer in &self.producers.order_paid_producer {
                        producer.publish_event(event.clone()).await;
                    }
                },
                Settlement::Cancelled | Settlement::Failed => {
                    info!("💰️ Order {order_id} was annulled ({})", result.order().status);
                    let event = OrderAnnulledEvent::new(result.order().clone());
                    for producer in &self.producers.order_annulled_producer {
                        producer.publish_event(event.clone()).await;
                    }
                },
            }
        } else {
            debug!("💰️ Order {order_id} had already settled. Callback ignored.");
        }
        Ok(result)
    }

    /// Moves a placed order along the fulfillment chain.
    pub async fn advance_fulfillment(
        &self,
        order_id: &OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, CheckoutError> {
        let order = self.db.advance_fulfillment(order_id, new_status).await?;
        info!("🚚️ Order {order_id} is now {new_status}");
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, CheckoutError> {
        self.db.fetch_order(order_id).await
    }

    /// An order together with its captured line items.
    pub async fn order_detail(&self, order_id: &OrderId) -> Result<Option<(Order, Vec<OrderItem>)>, CheckoutError> {
        let Some(order) = self.db.fetch_order(order_id).await? else {
            return Ok(None);
        };
        let items = self.db.fetch_order_items(order.id).await?;
        Ok(Some((order, items)))
    }

    pub async fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, CheckoutError> {
        self.db.fetch_orders_for_customer(customer_id).await
    }
}
