//! Trait seams between the checkout flows and their backing store.
//!
//! The HTTP layer is generic over these traits, which is what lets the endpoint tests run
//! against mocks while production runs against the SQLite backend.

mod cart_management;
mod checkout_database;
mod data_objects;
mod item_catalog;
mod order_management;

pub use cart_management::CartManagement;
pub use checkout_database::{CheckoutDatabase, CheckoutError};
pub use data_objects::{Settlement, SettlementResult};
pub use item_catalog::ItemCatalog;
pub use order_management::OrderManagement;
