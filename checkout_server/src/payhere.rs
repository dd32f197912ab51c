//! PayHere gateway integration: outbound payment-session signing and inbound notification
//! verification.
//!
//! Both directions use the gateway's MD5 scheme. The digest is computed over a fixed
//! concatenation of fields with the (pre-hashed, uppercased) merchant secret appended, and the
//! result is uppercased. The amount enters the digest as the canonical two-decimal string, which
//! is exactly what [`shop_common::Cents`] renders, so the signed amount and the stored amount can
//! never drift apart through formatting.

use checkout_engine::{db_types::Order, traits::Settlement};
use log::warn;
use serde::{Deserialize, Serialize};
use shop_common::Secret;

use crate::{config::ServerConfig, data_objects::PaymentNotification};

fn md5_upper(s: &str) -> String {
    format!("{:x}", md5::compute(s.as_bytes())).to_uppercase()
}

fn hashed_secret(secret: &Secret<String>) -> String {
    md5_upper(secret.reveal())
}

/// The signature embedded in an outbound payment session:
/// `MD5(merchant_id + order_id + amount + currency + MD5(secret))`, all uppercased.
pub fn session_signature(
    merchant_id: &str,
    order_id: &str,
    amount: &str,
    currency: &str,
    secret: &Secret<String>,
) -> String {
    md5_upper(&format!("{merchant_id}{order_id}{amount}{currency}{}", hashed_secret(secret)))
}

/// The signature the gateway attaches to a payment notification. Identical to the session
/// signature except that the status code is hashed in before the secret, binding the signature
/// to the reported outcome as well as to the order and amount.
pub fn notification_signature(
    merchant_id: &str,
    order_id: &str,
    amount: &str,
    currency: &str,
    status_code: &str,
    secret: &Secret<String>,
) -> String {
    md5_upper(&format!("{merchant_id}{order_id}{amount}{currency}{status_code}{}", hashed_secret(secret)))
}

/// Recomputes the notification signature from the posted fields and compares it to the one the
/// gateway sent. Everything the notification asserts (order, amount, currency, outcome) is an
/// input to the digest, so any tampering invalidates it.
pub fn verify_notification(notification: &PaymentNotification, config: &ServerConfig) -> bool {
    let expected = notification_signature(
        &config.payhere.merchant_id,
        &notification.order_id,
        &notification.payhere_amount,
        &notification.payhere_currency,
        &notification.status_code,
        &config.payhere.merchant_secret,
    );
    notification.merchant_id == config.payhere.merchant_id && notification.md5sig == expected
}

/// Maps a gateway status code onto the engine's settlement transitions. `None` means the
/// notification carries no settlement (a pending progress report, or a code we do not know).
pub fn settlement_for_status_code(status_code: &str) -> Option<Settlement> {
    match status_code {
        "2" => Some(Settlement::Paid),
        "-1" => Some(Settlement::Cancelled),
        "-2" => Some(Settlement::Failed),
        "-3" => {
            // Chargebacks arrive after settlement and need a manual follow-up; they are not a
            // state transition the engine can apply.
            warn!("💰️ Chargeback reported by the gateway. Manual follow-up required.");
            None
        },
        "0" => None,
        other => {
            warn!("💰️ Unrecognized gateway status code: {other}");
            None
        },
    }
}

/// Everything the client needs to hand the customer's browser over to the gateway. The merchant
/// secret itself never appears here; only the derived signature does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSession {
    pub merchant_id: String,
    pub return_url: String,
    pub cancel_url: String,
    pub notify_url: String,
    pub order_id: String,
    pub items: String,
    pub amount: String,
    pub currency: String,
    pub hash: String,
}

impl PaymentSession {
    pub fn build(order: &Order, config: &ServerConfig) -> Self {
        let amount = order.total_price.to_string();
        let hash = session_signature(
            &config.payhere.merchant_id,
            order.order_id.as_str(),
            &amount,
            &order.currency,
            &config.payhere.merchant_secret,
        );
        Self {
            merchant_id: config.payhere.merchant_id.clone(),
            return_url: config.return_url.clone(),
            cancel_url: config.cancel_url.clone(),
            notify_url: config.notify_url.clone(),
            order_id: order.order_id.as_str().to_string(),
            items: format!("Order {}", order.tracking_number),
            amount,
            currency: order.currency.clone(),
            hash,
        }
    }
}
