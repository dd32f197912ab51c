use sqlx::{Row, SqliteConnection};

use crate::traits::CheckoutError;

/// Checks that the address exists and belongs to the given customer.
pub async fn address_exists(
    address_id: &str,
    customer_id: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, CheckoutError> {
    let row = sqlx::query("SELECT COUNT(*) as n FROM addresses WHERE id = ? AND customer_id = ?")
        .bind(address_id)
        .bind(customer_id)
        .fetch_one(conn)
        .await?;
    let n: i64 = row.get("n");
    Ok(n > 0)
}
