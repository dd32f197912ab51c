use crate::{
    db_types::{Order, OrderId, OrderItem},
    traits::CheckoutError,
};

/// Read access to committed orders.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Fetches an order by its public order id. `Ok(None)` if no such order exists.
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, CheckoutError>;

    /// Fetches the captured line items for an order, by the order's internal row id.
    async fn fetch_order_items(&self, order_row_id: i64) -> Result<Vec<OrderItem>, CheckoutError>;

    /// All orders belonging to a customer, newest first.
    async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, CheckoutError>;
}
