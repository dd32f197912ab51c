//! The order-checkout and payment-reconciliation engine.
//!
//! This crate owns the storage-facing half of the store's order flow:
//!
//! * [`db_types`] — the order, item and cart records and their status state machines.
//! * [`pricing`] — the authoritative price calculation and the client-total cross-check.
//! * [`traits`] — the backend seams ([`traits::CheckoutDatabase`] et al.) the HTTP layer is
//!   generic over.
//! * [`sqlite`] — the SQLite implementation of those seams, including the atomic checkout
//!   transaction and the compare-and-set settlement update.
//! * [`api`] — [`OrderFlowApi`] and [`CartApi`], the high-level entry points the server calls.
//! * [`events`] — fire-and-forget hooks that run after an order is created, paid or annulled.
//!
//! The engine knows nothing about HTTP or about any specific payment gateway. Gateway signature
//! verification and status-code mapping live in the server crate; by the time a call reaches
//! [`OrderFlowApi::settle_order`] it has already been authenticated.

pub mod api;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod pricing;
pub mod sqlite;
pub mod traits;

pub use api::{CartApi, CheckoutPolicy, OrderFlowApi};
pub use sqlite::SqliteDatabase;
