use checkout_engine::{
    db_types::{CartLine, CheckoutSummary, Item, NewOrder, Order, OrderId, OrderItem, OrderStatus},
    pricing::PricingRules,
    traits::{CartManagement, CheckoutDatabase, CheckoutError, ItemCatalog, OrderManagement, Settlement, SettlementResult},
};
use mockall::mock;

mock! {
    pub CheckoutBackend {}

    impl Clone for CheckoutBackend {
        fn clone(&self) -> Self;
    }

    impl ItemCatalog for CheckoutBackend {
        async fn fetch_item(&self, item_id: &str) -> Result<Option<Item>, CheckoutError>;
    }

    impl CartManagement for CheckoutBackend {
        async fn fetch_cart(&self, customer_id: &str) -> Result<Vec<CartLine>, CheckoutError>;
        async fn clear_cart(&self, customer_id: &str) -> Result<u64, CheckoutError>;
    }

    impl OrderManagement for CheckoutBackend {
        async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, CheckoutError>;
        async fn fetch_order_items(&self, order_row_id: i64) -> Result<Vec<OrderItem>, CheckoutError>;
        async fn fetch_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, CheckoutError>;
    }

    impl CheckoutDatabase for CheckoutBackend {
        fn url(&self) -> &str;
        async fn create_order(&self, order: NewOrder, rules: &PricingRules) -> Result<CheckoutSummary, CheckoutError>;
        async fn settle_order(&self, order_id: &OrderId, settlement: Settlement) -> Result<SettlementResult, CheckoutError>;
        async fn advance_fulfillment(&self, order_id: &OrderId, new_status: OrderStatus) -> Result<Order, CheckoutError>;
        async fn close(&mut self) -> Result<(), CheckoutError>;
    }
}
