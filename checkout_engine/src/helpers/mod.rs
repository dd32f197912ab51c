//! Identifier generation for new orders.

use chrono::Utc;
use rand::Rng;

use crate::db_types::OrderId;

/// Generates a fresh opaque order id: 16 random bytes, hex encoded.
pub fn new_order_id() -> OrderId {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 16] = rng.gen();
    let hex = bytes.iter().map(|b| format!("{b:02x}")).collect::<String>();
    OrderId(hex)
}

/// Generates a human-readable tracking number: `TRK-<unix millis>-<3-digit random suffix>`.
///
/// Collision resistance comes from the timestamp plus the random suffix; actual uniqueness is
/// enforced by the database constraint, and a collision there is retried with a fresh number.
pub fn new_tracking_number() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("TRK-{millis}-{suffix:03}")
}
