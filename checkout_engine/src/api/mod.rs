mod cart_api;
mod order_flow_api;

pub use cart_api::CartApi;
pub use order_flow_api::{CheckoutPolicy, OrderFlowApi};
