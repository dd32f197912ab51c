//! The gateway-facing webhook.
//!
//! PayHere posts a form-encoded notification to this endpoint after every payment attempt.
//! Verification happens before anything else: a notification whose MD5 signature does not check
//! out is rejected with a 400 and touches no state. Verified notifications are acknowledged with
//! a 200 `OK` body even when the referenced order is unknown or already settled, because the
//! gateway treats anything else as a delivery failure and keeps retrying.

use actix_web::{web, HttpResponse};
use checkout_engine::{db_types::OrderId, traits::{CheckoutDatabase, CheckoutError}, OrderFlowApi};
use log::*;

use crate::{
    config::ServerConfig,
    data_objects::PaymentNotification,
    errors::ServerError,
    payhere::{settlement_for_status_code, verify_notification},
    route,
};

route!(payhere_notify => Post "/payhere/notify" impl CheckoutDatabase);
pub async fn payhere_notify<B>(
    body: web::Form<PaymentNotification>,
    api: web::Data<OrderFlowApi<B>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError>
where
    B: CheckoutDatabase,
{
    let notification = body.into_inner();
    let order_id = OrderId(notification.order_id.clone());
    debug!("💰️ Payment notification for order {order_id} with status code {}", notification.status_code);
    if !verify_notification(&notification, &config) {
        warn!("💰️ Rejecting payment notification for order {order_id}: signature verification failed");
        return Err(ServerError::InvalidPaymentSignature);
    }
    let Some(settlement) = settlement_for_status_code(&notification.status_code) else {
        debug!("💰️ Notification for order {order_id} carries no settlement. Acknowledging.");
        return Ok(HttpResponse::Ok().body("OK"));
    };
    match api.settle_order(&order_id, settlement).await {
        Ok(result) => {
            let order = result.order();
            // The signature already binds the amount; a drift here means the gateway session
            // was built against a different total. Worth a loud line, nothing more.
            if order.total_price.to_string() != notification.payhere_amount {
                warn!(
                    "💰️ Gateway reported amount {} for order {order_id}, but the stored total is {}",
                    notification.payhere_amount, order.total_price
                );
            }
            if result.was_applied() {
                info!("💰️ Order {order_id} settled as {}/{}", order.status, order.payment_status);
            } else {
                info!("💰️ Order {order_id} had already settled. Duplicate notification ignored.");
            }
        },
        Err(CheckoutError::OrderNotFound(_)) => {
            // A verified notification for an order we never issued. Acknowledge it so the
            // gateway stops retrying, but leave a loud trail.
            warn!("💰️ Verified payment notification for unknown order {order_id}. Acknowledging without action.");
        },
        Err(e) => {
            // A backend failure gets a 5xx so the gateway redelivers; the CAS settlement makes
            // the redelivery safe.
            error!("💰️ Could not settle order {order_id}. The gateway will retry. {e}");
            return Err(e.into());
        },
    }
    Ok(HttpResponse::Ok().body("OK"))
}
