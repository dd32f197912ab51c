use crate::{db_types::CartLine, traits::CheckoutError};

/// Read (and bulk-clear) access to customer carts.
///
/// A snapshot read may race with a concurrent cart mutation; that is fine, because the
/// order-creation transaction re-validates item availability and prices rather than trusting
/// the snapshot.
#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// Returns the customer's cart lines. An empty vector (no cart) is not an error.
    async fn fetch_cart(&self, customer_id: &str) -> Result<Vec<CartLine>, CheckoutError>;

    /// Removes every line from the customer's cart. Returns the number of lines removed.
    async fn clear_cart(&self, customer_id: &str) -> Result<u64, CheckoutError>;
}
