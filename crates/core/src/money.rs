//! Monetary amounts in whole XAF francs.
//!
//! The franc CFA has no minor unit in practice, so amounts are plain `u64`
//! franc counts behind a newtype. Rate application rounds half away from
//! zero, which keeps composed totals exact for the rates in use.

use serde::{Deserialize, Serialize};

/// An amount in whole francs. Immutable, compared by value.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_francs(francs: u64) -> Self {
        Self(francs)
    }

    pub const fn francs(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `quantity × unit price`, the line-item building block.
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Apply a fractional rate (e.g. `0.18` for 18%), rounding half away
    /// from zero. Negative rates yield zero.
    pub fn apply_rate(self, rate: f64) -> Money {
        if rate <= 0.0 || !rate.is_finite() {
            return Money::ZERO;
        }
        Money((self.0 as f64 * rate).round() as u64)
    }

    /// Apply a percentage in `[0, 100]`; out-of-range input is clamped.
    pub fn percent(self, pct: f64) -> Money {
        let pct = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 };
        self.apply_rate(pct / 100.0)
    }

    /// Subtraction that never underflows.
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Cap this amount at `ceiling`.
    pub fn min(self, ceiling: Money) -> Money {
        Money(self.0.min(ceiling.0))
    }
}

impl core::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_application_rounds_half_away() {
        assert_eq!(Money::from_francs(60_000).apply_rate(0.18).francs(), 10_800);
        assert_eq!(Money::from_francs(60_000).apply_rate(0.01).francs(), 600);
        // 333 × 0.015 = 4.995 → 5
        assert_eq!(Money::from_francs(333).apply_rate(0.015).francs(), 5);
    }

    #[test]
    fn percent_clamps_out_of_range_values() {
        let base = Money::from_francs(1_000);
        assert_eq!(base.percent(150.0), base);
        assert_eq!(base.percent(-10.0), Money::ZERO);
        assert_eq!(base.percent(f64::NAN), Money::ZERO);
    }

    #[test]
    fn saturating_sub_never_underflows() {
        let a = Money::from_francs(100);
        let b = Money::from_francs(250);
        assert_eq!(a.saturating_sub(b), Money::ZERO);
        assert_eq!(b.saturating_sub(a).francs(), 150);
    }
}
