use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{CartLine, ItemSelection},
    traits::CheckoutError,
};

pub async fn fetch_cart_lines(
    customer_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Vec<CartLine>, CheckoutError> {
    let lines = sqlx::query_as::<_, CartLine>(
        "SELECT item_id, qty, price_at_add, image FROM cart_items WHERE customer_id = ? ORDER BY item_id",
    )
    .bind(customer_id)
    .fetch_all(conn)
    .await?;
    Ok(lines)
}

/// Decrements the ordered quantities from the customer's cart, removing lines that reach zero.
/// Runs inside the order-creation transaction so that an aborted checkout leaves the cart
/// untouched.
pub async fn remove_ordered_lines(
    customer_id: &str,
    items: &[ItemSelection],
    conn: &mut SqliteConnection,
) -> Result<(), CheckoutError> {
    for selection in items {
        sqlx::query("UPDATE cart_items SET qty = qty - ? WHERE customer_id = ? AND item_id = ?")
            .bind(selection.qty)
            .bind(customer_id)
            .bind(&selection.item_id)
            .execute(&mut *conn)
            .await?;
    }
    let removed = sqlx::query("DELETE FROM cart_items WHERE customer_id = ? AND qty <= 0")
        .bind(customer_id)
        .execute(conn)
        .await?;
    trace!("🛒️ Removed {} exhausted cart lines for customer {customer_id}", removed.rows_affected());
    Ok(())
}

pub async fn clear_cart(customer_id: &str, conn: &mut SqliteConnection) -> Result<u64, CheckoutError> {
    let res = sqlx::query("DELETE FROM cart_items WHERE customer_id = ?").bind(customer_id).execute(conn).await?;
    Ok(res.rows_affected())
}
