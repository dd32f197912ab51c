//! Post-commit notification hooks.
//!
//! These run on the event channels after the relevant database transaction has committed. They
//! are strictly fire-and-forget: a confirmation that cannot be delivered never affects order
//! state. Until a real mail/SMS integration lands, delivery is a structured log line.

use checkout_engine::events::EventHooks;
use log::info;

pub fn configure_event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_order_created(|event| {
        Box::pin(async move {
            let order = &event.order;
            info!(
                "📧️ Order confirmation for customer {}: order {} ({} line items, {} {}), tracking {}",
                order.customer_id,
                order.order_id,
                event.items.len(),
                order.total_price,
                order.currency,
                order.tracking_number
            );
        })
    });
    hooks.on_order_paid(|event| {
        Box::pin(async move {
            let order = &event.order;
            info!(
                "📧️ Payment confirmation for customer {}: order {} is paid and placed. Estimated delivery {}",
                order.customer_id,
                order.order_id,
                order.est_delivery.format("%Y-%m-%d")
            );
        })
    });
    hooks.on_order_annulled(|event| {
        Box::pin(async move {
            let order = &event.order;
            info!(
                "📧️ Order {} for customer {} was not completed ({})",
                order.order_id, order.customer_id, event.status
            );
        })
    });
    hooks
}
