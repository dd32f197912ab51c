use crate::{
    db_types::CartLine,
    traits::{CartManagement, CheckoutError},
};

/// Read and housekeeping access to customer carts.
#[derive(Debug, Clone)]
pub struct CartApi<B> {
    db: B,
}

impl<B: CartManagement> CartApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn cart_for_customer(&self, customer_id: &str) -> Result<Vec<CartLine>, CheckoutError> {
        self.db.fetch_cart(customer_id).await
    }

    pub async fn empty_cart(&self, customer_id: &str) -> Result<u64, CheckoutError> {
        self.db.clear_cart(customer_id).await
    }
}
