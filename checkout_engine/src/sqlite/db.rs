use chrono::{Duration, Utc};
use log::debug;
use sqlx::SqlitePool;

use crate::{
    db_types::{CartLine, CheckoutSummary, Item, NewOrder, Order, OrderId, OrderItem, OrderStatus},
    pricing::{self, PricedLine, PricingRules},
    sqlite::{addresses, carts, items, new_pool, orders},
    traits::{CartManagement, CheckoutDatabase, CheckoutError, ItemCatalog, OrderManagement, Settlement, SettlementResult},
};

const DELIVERY_ESTIMATE_DAYS: i64 = 5;

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl std::fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object and runs any pending migrations.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, CheckoutError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl ItemCatalog for SqliteDatabase {
    async fn fetch_item(&self, item_id: &str) -> Result<Option<Item>, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        items::fetch_item(item_id, &mut conn).await
    }
}

impl CartManagement for SqliteDatabase {
    async fn fetch_cart(&self, customer_id: &str) -> Result<Vec<CartLine>, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        carts::fetch_cart_lines(customer_id, &mut conn).await
    }

    async fn clear_cart(&self, customer_id: &str) -> Result<u64, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        carts::clear_cart(customer_id, &mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_order_id(order_id, &mut conn).await
    }

    async fn fetch_order_items(&self, order_row_id: i64) -> Result<Vec<OrderItem>, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_items(order_row_id, &mut conn).await
    }

    async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, CheckoutError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_customer(customer_id, &mut conn).await
    }
}

impl CheckoutDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn create_order(&self, order: NewOrder, rules: &PricingRules) -> Result<CheckoutSummary, CheckoutError> {
        let mut tx = self.pool.begin().await?;
        if !addresses::address_exists(&order.address_id, &order.customer_id, &mut tx).await? {
            return Err(CheckoutError::AddressNotFound(order.address_id.clone()));
        }
        // Resolve every item against the catalog inside the transaction so the whole order prices
        // off one consistent snapshot.
        let mut lines = Vec::with_capacity(order.items.len());
        for selection in &order.items {
            let item = items::fetch_item(&selection.item_id, &mut tx)
                .await?
                .ok_or_else(|| CheckoutError::ItemNotFound(selection.item_id.clone()))?;
            lines.push(PricedLine { item_id: item.id, qty: selection.qty, unit_price: item.price });
        }
        let breakdown = pricing::price_order(&lines, rules)?;
        if let Some(submitted) = order.client_total {
            pricing::verify_submitted_total(breakdown.total, submitted, rules.tolerance)?;
        }
        let est_delivery = Utc::now() + Duration::days(DELIVERY_ESTIMATE_DAYS);
        let row_id = orders::insert_order(&order, breakdown.total, est_delivery, &mut tx).await?;
        orders::insert_order_items(row_id, &lines, &mut tx).await?;
        if order.clear_cart {
            carts::remove_ordered_lines(&order.customer_id, &order.items, &mut tx).await?;
        }
        let committed = orders::fetch_order_by_order_id(&order.order_id, &mut tx)
            .await?
            .ok_or_else(|| CheckoutError::DatabaseError("Order row vanished before commit".to_string()))?;
        let order_items = orders::fetch_order_items(row_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order {} committed. Total: {}", committed.order_id, committed.total_price);
        Ok(CheckoutSummary { order: committed, items: order_items })
    }

    async fn settle_order(
        &self,
        order_id: &OrderId,
        settlement: Settlement,
    ) -> Result<SettlementResult, CheckoutError> {
        let mut tx = self.pool.begin().await?;
        let result = orders::settle_order(order_id, settlement, &mut tx).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn advance_fulfillment(&self, order_id: &OrderId, new_status: OrderStatus) -> Result<Order, CheckoutError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::advance_fulfillment(order_id, new_status, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn close(&mut self) -> Result<(), CheckoutError> {
        self.pool.close().await;
        Ok(())
    }
}
