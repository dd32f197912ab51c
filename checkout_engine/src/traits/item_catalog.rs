use crate::{db_types::Item, traits::CheckoutError};

/// Read access to the item catalog. The catalog is owned by another service; the checkout core
/// only ever accepts its answers.
#[allow(async_fn_in_trait)]
pub trait ItemCatalog {
    /// Fetches a single catalog item. `Ok(None)` means the item does not exist.
    async fn fetch_item(&self, item_id: &str) -> Result<Option<Item>, CheckoutError>;
}
