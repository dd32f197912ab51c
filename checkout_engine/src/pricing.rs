//! The pricing authority.
//!
//! Order totals are a pure function of persisted item prices, the requested quantities, and the
//! deterministic surcharge rules configured for the store. Client-submitted totals are never an
//! input to the total; they are only ever compared against the computed figure, with an explicit
//! tolerance, and rejected on divergence.

use serde::{Deserialize, Serialize};
use shop_common::Cents;

use crate::traits::CheckoutError;

/// Deterministic surcharge rules applied on top of the item subtotal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRules {
    /// Tax, as an integer percentage of the subtotal.
    pub tax_percent: i64,
    /// Flat shipping fee, waived for subtotals at or above `free_shipping_threshold`.
    pub shipping_fee: Cents,
    pub free_shipping_threshold: Cents,
    /// Maximum absolute difference allowed between the computed total and a client-submitted
    /// cross-check total.
    pub tolerance: Cents,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            tax_percent: 10,
            shipping_fee: Cents::from(500),
            free_shipping_threshold: Cents::from(10_000),
            tolerance: Cents::from(1),
        }
    }
}

/// A line that has been resolved against the catalog: the unit price here is the persisted
/// catalog price, not anything the client sent.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub item_id: String,
    pub qty: i64,
    pub unit_price: Cents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Cents,
    pub tax: Cents,
    pub shipping: Cents,
    pub total: Cents,
}

/// Computes the authoritative total for the given resolved lines.
///
/// Every step is checked arithmetic. A quantity large enough to wrap an `i64` rejects the order
/// instead of committing a wrapped total.
pub fn price_order(lines: &[PricedLine], rules: &PricingRules) -> Result<PriceBreakdown, CheckoutError> {
    let overflow =
        || CheckoutError::ValidationError("The order total exceeds the representable amount".to_string());
    let mut subtotal = Cents::default();
    for line in lines {
        let line_total = line.unit_price.times(line.qty).ok_or_else(overflow)?;
        subtotal = subtotal.checked_add(line_total).ok_or_else(overflow)?;
    }
    let tax = subtotal.percent(rules.tax_percent).ok_or_else(overflow)?;
    let shipping =
        if subtotal >= rules.free_shipping_threshold { Cents::default() } else { rules.shipping_fee };
    let total = subtotal.checked_add(tax).and_then(|t| t.checked_add(shipping)).ok_or_else(overflow)?;
    Ok(PriceBreakdown { subtotal, tax, shipping, total })
}

/// Compares a client-submitted total against the computed one.
///
/// Both values are surfaced in the error so the caller can show the client what the server
/// computed. A mismatch is never silently accepted.
pub fn verify_submitted_total(computed: Cents, submitted: Cents, tolerance: Cents) -> Result<(), CheckoutError> {
    if computed.abs_diff(submitted) <= tolerance {
        Ok(())
    } else {
        Err(CheckoutError::PriceMismatch { computed, submitted })
    }
}
