use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderStatus, PaymentStatus};

/// The state-machine outcome a verified gateway callback is asking for.
///
/// The mapping from gateway status codes to these variants lives in the server layer; the
/// engine only knows about the canonical transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Settlement {
    /// Payment confirmed: `{Placed, Paid}`.
    Paid,
    /// Customer abandoned the payment: `{Cancelled, Failed}`.
    Cancelled,
    /// The gateway reported a hard failure: `{Failed, Failed}`.
    Failed,
}

impl Settlement {
    /// The `(status, payment_status)` pair this settlement moves a pending order to.
    pub fn target(&self) -> (OrderStatus, PaymentStatus) {
        match self {
            Settlement::Paid => (OrderStatus::Placed, PaymentStatus::Paid),
            Settlement::Cancelled => (OrderStatus::Cancelled, PaymentStatus::Failed),
            Settlement::Failed => (OrderStatus::Failed, PaymentStatus::Failed),
        }
    }
}

/// Result of a conditional settlement update.
#[derive(Debug, Clone)]
pub enum SettlementResult {
    /// The order was in `Pending` payment state and the transition was applied.
    Applied(Order),
    /// The order had already left the `Pending` payment state; nothing was changed. Duplicate
    /// success callbacks land here, which is what makes settlement idempotent under
    /// at-least-once webhook delivery.
    Unchanged(Order),
}

impl SettlementResult {
    pub fn order(&self) -> &Order {
        match self {
            SettlementResult::Applied(o) | SettlementResult::Unchanged(o) => o,
        }
    }

    pub fn was_applied(&self) -> bool {
        matches!(self, SettlementResult::Applied(_))
    }
}
