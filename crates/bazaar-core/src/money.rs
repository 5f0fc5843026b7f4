//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, plus the
//! `SalesTax` percentage type applied to sale proceeds.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                         │
//! │                                                                     │
//! │  The price curve itself is inherently floating point (it is an      │
//! │  exponential), but once a batch total leaves the engine it is a     │
//! │  currency amount. We convert to integer cents at exactly one        │
//! │  boundary: `Money::from_f64_rounded`, which rounds half-up to       │
//! │  2 decimal places. Everything downstream is exact integer math.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Curve output crosses the float/integer boundary exactly once
//! let total = Money::from_f64_rounded(9.5648);
//! assert_eq!(total.cents(), 956);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: room for very large batch totals; negative values are
///   representable but the engine never produces them
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support so totals can cross to the caller as-is
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a raw curve total into Money, rounding half-up to 2 decimal
    /// places.
    ///
    /// This is the single float-to-currency boundary in the crate. `round()`
    /// is half-away-from-zero, which is half-up for the non-negative totals
    /// the pricing engine produces.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::money::Money;
    ///
    /// assert_eq!(Money::from_f64_rounded(0.125).cents(), 13); // half rounds up
    /// assert_eq!(Money::from_f64_rounded(9.5648).cents(), 956);
    /// ```
    #[inline]
    pub fn from_f64_rounded(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Display shows money in a human-readable `$x.yz` format.
///
/// For debugging and logs; localized display belongs to the caller.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Sales Tax
// =============================================================================

/// Sales tax as a whole percentage, guaranteed in `[0, 100]`.
///
/// Deducted from sale proceeds *before* the currency rounding boundary, so
/// the tax applies to the exact curve total rather than the rounded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalesTax(u8);

impl SalesTax {
    /// Creates a sales tax rate, clamping into `[0, 100]`.
    ///
    /// Config normalization reports the clamp as a `Correction`; this
    /// constructor just enforces the invariant.
    #[inline]
    pub fn from_percent(percent: i32) -> Self {
        SalesTax(percent.clamp(0, 100) as u8)
    }

    /// Returns the rate as a whole percentage.
    #[inline]
    pub const fn percent(&self) -> u8 {
        self.0
    }

    /// Checks if the rate is zero (no deduction).
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the given proceeds minus the sales tax.
    ///
    /// `deduct(p) = p * (1 - tax/100)`; equals `p` exactly when the rate is
    /// zero, and never exceeds `p` for non-negative `p`.
    #[inline]
    pub fn deduct(&self, proceeds: f64) -> f64 {
        proceeds * (1.0 - f64::from(self.0) / 100.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
    }

    #[test]
    fn test_from_f64_rounded_half_up() {
        assert_eq!(Money::from_f64_rounded(0.76).cents(), 76);
        // exact binary half: 0.125 * 100 = 12.5, rounds away from zero
        assert_eq!(Money::from_f64_rounded(0.125).cents(), 13);
        assert_eq!(Money::from_f64_rounded(0.754).cents(), 75);
        assert_eq!(Money::from_f64_rounded(9.5648).cents(), 956);
        assert_eq!(Money::from_f64_rounded(0.0).cents(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut acc = Money::zero();
        acc += a;
        acc -= b;
        assert_eq!(acc.cents(), 500);
    }

    #[test]
    fn test_sales_tax_clamps() {
        assert_eq!(SalesTax::from_percent(-5).percent(), 0);
        assert_eq!(SalesTax::from_percent(0).percent(), 0);
        assert_eq!(SalesTax::from_percent(17).percent(), 17);
        assert_eq!(SalesTax::from_percent(100).percent(), 100);
        assert_eq!(SalesTax::from_percent(250).percent(), 100);
    }

    #[test]
    fn test_sales_tax_deduct() {
        let tax = SalesTax::from_percent(25);
        assert!((tax.deduct(100.0) - 75.0).abs() < 1e-12);

        // Zero rate is the identity
        let zero = SalesTax::from_percent(0);
        assert!(zero.is_zero());
        assert_eq!(zero.deduct(42.5), 42.5);

        // 100% rate taxes everything away
        let full = SalesTax::from_percent(100);
        assert_eq!(full.deduct(42.5), 0.0);
    }

    /// Tax non-negativity: deduct(p) <= p for all p >= 0 and any valid rate.
    #[test]
    fn test_tax_never_increases_proceeds() {
        for percent in 0..=100 {
            let tax = SalesTax::from_percent(percent);
            for p in [0.0_f64, 0.01, 1.0, 99.99, 12_345.67] {
                assert!(tax.deduct(p) <= p, "percent={percent} p={p}");
                assert!(tax.deduct(p) >= 0.0, "percent={percent} p={p}");
            }
        }
    }
}
