use chrono::{DateTime, Utc};
use log::debug;
use sqlx::{Row, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderItem, OrderStatus, PaymentStatus},
    pricing::PricedLine,
    traits::{CheckoutError, Settlement, SettlementResult},
};
use shop_common::Cents;

const ORDER_COLUMNS: &str = "id, order_id, tracking_number, customer_id, address_id, total_price, currency, status, \
                             payment_status, est_delivery, created_at, updated_at";

/// Inserts the order header row and returns its row id. A unique-constraint violation on the
/// tracking number is surfaced as [`CheckoutError::DuplicateTrackingNumber`] so the caller can
/// retry with a fresh one.
pub async fn insert_order(
    order: &NewOrder,
    total_price: Cents,
    est_delivery: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<i64, CheckoutError> {
    let row = sqlx::query(
        "INSERT INTO orders (order_id, tracking_number, customer_id, address_id, total_price, currency, \
         est_delivery) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(order.order_id.as_str())
    .bind(&order.tracking_number)
    .bind(&order.customer_id)
    .bind(&order.address_id)
    .bind(total_price)
    .bind(&order.currency)
    .bind(est_delivery)
    .fetch_one(conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(de) if de.is_unique_violation() && de.message().contains("tracking_number") => {
            CheckoutError::DuplicateTrackingNumber(order.tracking_number.clone())
        },
        _ => CheckoutError::from(e),
    })?;
    let id = row.get::<i64, _>("id");
    debug!("🗃️ Inserted order {} with row id {id}", order.order_id);
    Ok(id)
}

pub async fn insert_order_items(
    order_row_id: i64,
    lines: &[PricedLine],
    conn: &mut SqliteConnection,
) -> Result<(), CheckoutError> {
    for line in lines {
        sqlx::query("INSERT INTO order_items (order_id, item_id, qty, unit_price) VALUES (?, ?, ?, ?)")
            .bind(order_row_id)
            .bind(&line.item_id)
            .bind(line.qty)
            .bind(line.unit_price)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, CheckoutError> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?"))
        .bind(order_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

pub async fn fetch_order_items(order_row_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, CheckoutError> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, item_id, qty, unit_price FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_row_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

pub async fn fetch_orders_for_customer(
    customer_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, CheckoutError> {
    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(customer_id)
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

/// Applies a settlement with a compare-and-set on the payment status. Only an order that is still
/// `Pending` is updated; a second notification for the same order matches zero rows and the order
/// is returned unchanged. This makes gateway callbacks idempotent without any read-modify-write
/// window.
pub async fn settle_order(
    order_id: &OrderId,
    settlement: Settlement,
    conn: &mut SqliteConnection,
) -> Result<SettlementResult, CheckoutError> {
    let (status, payment_status) = settlement.target();
    let res = sqlx::query(
        "UPDATE orders SET status = ?, payment_status = ?, updated_at = CURRENT_TIMESTAMP \
         WHERE order_id = ? AND payment_status = ?",
    )
    .bind(status.to_string())
    .bind(payment_status.to_string())
    .bind(order_id.as_str())
    .bind(PaymentStatus::Pending.to_string())
    .execute(&mut *conn)
    .await?;
    let order =
        fetch_order_by_order_id(order_id, conn).await?.ok_or_else(|| CheckoutError::OrderNotFound(order_id.clone()))?;
    if res.rows_affected() == 1 {
        debug!("🗃️ Order {order_id} settled as {status}/{payment_status}");
        Ok(SettlementResult::Applied(order))
    } else {
        debug!("🗃️ Order {order_id} was already settled. Leaving it as {}/{}", order.status, order.payment_status);
        Ok(SettlementResult::Unchanged(order))
    }
}

/// Moves an order one step along the fulfillment chain. The update is a compare-and-set on the
/// expected predecessor status, so concurrent callers cannot skip or repeat a step.
pub async fn advance_fulfillment(
    order_id: &OrderId,
    new_status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, CheckoutError> {
    let current =
        fetch_order_by_order_id(order_id, conn).await?.ok_or_else(|| CheckoutError::OrderNotFound(order_id.clone()))?;
    let expected = new_status.fulfillment_predecessor().ok_or(CheckoutError::IllegalStatusChange {
        order_id: order_id.clone(),
        from: current.status,
        to: new_status,
    })?;
    let res = sqlx::query(
        "UPDATE orders SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE order_id = ? AND status = ?",
    )
    .bind(new_status.to_string())
    .bind(order_id.as_str())
    .bind(expected.to_string())
    .execute(&mut *conn)
    .await?;
    let order =
        fetch_order_by_order_id(order_id, conn).await?.ok_or_else(|| CheckoutError::OrderNotFound(order_id.clone()))?;
    if res.rows_affected() == 1 {
        debug!("🗃️ Order {order_id} advanced to {new_status}");
        Ok(order)
    } else {
        Err(CheckoutError::IllegalStatusChange { order_id: order_id.clone(), from: order.status, to: new_status })
    }
}
