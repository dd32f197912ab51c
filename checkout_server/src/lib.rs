//! # Storefront checkout server
//!
//! The HTTP front end for the order-checkout and payment-reconciliation flows. It is
//! responsible for:
//! * accepting checkout requests, pricing them server-side and handing back a signed PayHere
//!   payment session,
//! * receiving and verifying PayHere payment notifications and settling orders exactly once,
//! * serving customers their carts and orders.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! * `GET /health`: liveness check.
//! * `POST /checkout`: place an order; returns the committed order and a payment session.
//! * `GET /cart`: the customer's cart.
//! * `DELETE /cart`: drop every line from the customer's cart.
//! * `GET /orders`, `GET /orders/{order_id}`: the customer's orders.
//! * `POST /orders/{order_id}/fulfillment`: advance a paid order along the fulfillment chain.
//! * `POST /payhere/notify`: the gateway webhook.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod notifier;
pub mod payhere;
pub mod payment_routes;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
