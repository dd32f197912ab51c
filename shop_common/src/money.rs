use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

/// A monetary amount in minor currency units (cents).
///
/// All prices and totals in the system are integer cents. The only place a fractional
/// representation exists is on the wire to the payment gateway, which requires a fixed
/// two-decimal string. [`Cents::to_string`] produces exactly that format, with no locale
/// variance, so the amount that is signed is byte-for-byte the amount that is verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Cents(i64);

op!(binary Cents, Add, add);
op!(binary Cents, Sub, sub);
op!(inplace Cents, AddAssign, add_assign);
op!(inplace Cents, SubAssign, sub_assign);
op!(unary Cents, Neg, neg);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a monetary amount: {0}")]
pub struct CentsConversionError(pub String);

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// The line total for `qty` units at this unit price, or `None` if the result does not fit
    /// in an `i64`. Quantities come from request bodies, so a wrapped product here would become
    /// a bogus order total.
    pub fn times(self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Self)
    }

    /// `pct` percent of this amount, truncated towards zero, or `None` if the intermediate
    /// product overflows. Truncation keeps surcharge calculations deterministic across platforms.
    pub fn percent(self, pct: i64) -> Option<Self> {
        self.0.checked_mul(pct).map(|v| Self(v / 100))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn abs_diff(self, other: Self) -> Self {
        Self((self.0 - other.0).abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Cents {
    type Err = CentsConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, s),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(CentsConversionError(s.to_string()));
        }
        if frac.len() > 2 {
            return Err(CentsConversionError(format!("{s} has more than 2 decimal places")));
        }
        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().map_err(|e| CentsConversionError(format!("{s}: {e}")))?
        };
        let mut cents = 0i64;
        if !frac.is_empty() {
            cents = frac.parse::<i64>().map_err(|e| CentsConversionError(format!("{s}: {e}")))?;
            if frac.len() == 1 {
                cents *= 10;
            }
        }
        Ok(Self(sign * (whole * 100 + cents)))
    }
}
