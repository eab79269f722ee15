//! Fixed-point money.
//!
//! Amounts are stored in tenths of a currency unit, so object prices that
//! are quoted in whole units are scaled by [`Money::PRICE_SCALE`] before
//! they reach a result or the ledger. No floating point is involved.

use serde::{Deserialize, Serialize};

/// An amount of money in tenths of a currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Display scaling applied to whole-unit object prices.
    pub const PRICE_SCALE: i64 = 10;

    /// Convert a whole-unit object price into money.
    pub fn from_price(price: i16) -> Self {
        Self(i64::from(price).saturating_mul(Self::PRICE_SCALE))
    }

    /// Return the raw value in tenths.
    pub const fn tenths(self) -> i64 {
        self.0
    }

    /// Whether the amount is exactly zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whether the amount is strictly positive.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Add two amounts, returning `None` on overflow.
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Subtract an amount, returning `None` on overflow.
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(diff) => Some(Self(diff)),
            None => None,
        }
    }

    /// Add two amounts, clamping at the numeric bounds.
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude.div_euclid(10);
        let tenths = magnitude.rem_euclid(10);
        write!(f, "{sign}{whole}.{tenths}0")
    }
}
