use sqlx::SqliteConnection;

use crate::{db_types::Item, traits::CheckoutError};

/// Fetches a catalog item by id. Returns `None` if the item does not exist.
pub async fn fetch_item(item_id: &str, conn: &mut SqliteConnection) -> Result<Option<Item>, CheckoutError> {
    let item = sqlx::query_as::<_, Item>("SELECT id, name, price, stock FROM items WHERE id = ?")
        .bind(item_id)
        .fetch_optional(conn)
        .await?;
    Ok(item)
}
