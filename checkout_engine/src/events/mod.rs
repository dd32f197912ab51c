//! Post-commit event hooks.
//!
//! The checkout flows emit events after their database transaction has committed (order
//! created, order paid, order annulled). Subscribers, such as the confirmation-notification
//! dispatcher, react to these asynchronously. Handlers run outside any transaction and
//! their failures never propagate back into the request that produced the event.

mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::{OrderAnnulledEvent, OrderCreatedEvent, OrderPaidEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
