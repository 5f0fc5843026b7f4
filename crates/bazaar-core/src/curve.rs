//! # Price Curve
//!
//! The pure, stateless exponential price curve: unit price as a function of
//! stock level, and its inverse.
//!
//! ## The Curve
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  unit_price(s) = clamp( base * vol_factor^(-clamp(s)) )             │
//! │                                                                     │
//! │  price                                                              │
//! │    │ price_ceiling ────────                                         │
//! │    │               ╲                                                │
//! │    │                ╲            lower stock  ⇒  higher price       │
//! │    │                 ╲___                                           │
//! │    │                     ╲──────                                    │
//! │    │ price_floor ───────────────────────                            │
//! │    └────────────────────────────────────── stock                    │
//! │      stock_floor              stock_ceiling                         │
//! │                                                                     │
//! │  vol_factor = 1 + volatility / 10_000                               │
//! │  volatility == 0  ⇒  flat curve at base price (no exponential)      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The inner clamp is on stock, the outer clamp on the resulting price.
//! Both pairs of bounds come from the good's configuration; the curve itself
//! holds a copy of exactly the fields it needs and nothing else.

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, MarketResult};
use crate::VOLATILITY_SCALE;

// =============================================================================
// Inverse Result
// =============================================================================

/// Which way a flat curve runs off to "infinite" stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Target price above base: only reachable by consuming stock forever.
    TowardLowStock,
    /// Target price below base: only reachable by accumulating stock forever.
    TowardHighStock,
}

/// Result of inverting the curve.
///
/// A flat curve (volatility 0) has no unique inverse except at the base
/// price itself, so the inverse is a tagged result rather than a min/max
/// float sentinel that could silently leak into arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockAtPrice {
    /// The (fractional) stock level at which the curve crosses the target.
    Finite(f64),
    /// Flat curve, target price never reached in this direction.
    Unbounded(Direction),
}

// =============================================================================
// Price Curve
// =============================================================================

/// The pricing parameters of one good, snapshotted for curve evaluation.
///
/// Cheap to copy; `CatalogEntry` rebuilds one per pricing call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceCurve {
    pub base_price: f64,
    pub price_floor: f64,
    pub price_ceiling: f64,
    pub stock_floor: i32,
    pub stock_ceiling: i32,
    pub volatility: i32,
}

impl PriceCurve {
    /// The per-unit multiplicative factor: `1 + volatility / 10_000`.
    ///
    /// Greater than 1 whenever volatility is positive; exactly 1 for a flat
    /// curve.
    #[inline]
    pub fn vol_factor(&self) -> f64 {
        1.0 + f64::from(self.volatility) / f64::from(VOLATILITY_SCALE)
    }

    /// Whether the curve is flat (price independent of stock level).
    #[inline]
    pub const fn is_flat(&self) -> bool {
        self.volatility == 0
    }

    /// Unit price at the given stock level.
    ///
    /// Clamps the stock level into `[stock_floor, stock_ceiling]` first,
    /// then clamps the computed price into `[price_floor, price_ceiling]`.
    /// Total over all inputs.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::curve::PriceCurve;
    ///
    /// let curve = PriceCurve {
    ///     base_price: 100.0,
    ///     price_floor: 0.01,
    ///     price_ceiling: 10_000.0,
    ///     stock_floor: 0,
    ///     stock_ceiling: 1000,
    ///     volatility: 500, // vol_factor = 1.05
    /// };
    ///
    /// // 100 * 1.05^-100 ≈ 0.7604
    /// assert!((curve.unit_price(100) - 0.7604).abs() < 0.001);
    /// ```
    pub fn unit_price(&self, stock_level: i32) -> f64 {
        self.raw_price(stock_level)
            .clamp(self.price_floor, self.price_ceiling)
    }

    /// Unit price with the stock clamp applied but *not* the price clamp.
    ///
    /// The batch pricer needs this to see whether a range's endpoint price
    /// has fallen below the floor (or risen above the ceiling); the fully
    /// clamped `unit_price` can never report that.
    #[inline]
    pub(crate) fn raw_price(&self, stock_level: i32) -> f64 {
        let clamped = stock_level.clamp(self.stock_floor, self.stock_ceiling);
        // powf, not powi: negating i32::MIN (the unbounded-floor sentinel)
        // would overflow
        self.base_price * self.vol_factor().powf(-f64::from(clamped))
    }

    /// Stock level at which the *unclamped* curve equals `target_price`.
    ///
    /// For a flat curve the inverse does not exist except at the base price:
    /// the result is `Unbounded` in the appropriate direction, or
    /// `Finite(current_stock)` when the target equals the base price (every
    /// stock level satisfies it; the current one is as good an answer as
    /// any).
    ///
    /// ## Errors
    /// `InvalidPriceDomain` when `target_price` or `base_price` is not
    /// strictly positive, since `-ln(target/base) / ln(vol_factor)` is
    /// undefined there.
    pub fn stock_at_price(&self, target_price: f64, current_stock: i32) -> MarketResult<StockAtPrice> {
        if target_price <= 0.0 || self.base_price <= 0.0 {
            return Err(MarketError::InvalidPriceDomain {
                target: target_price,
                base_price: self.base_price,
            });
        }

        if self.is_flat() {
            return Ok(if target_price > self.base_price {
                StockAtPrice::Unbounded(Direction::TowardLowStock)
            } else if target_price < self.base_price {
                StockAtPrice::Unbounded(Direction::TowardHighStock)
            } else {
                StockAtPrice::Finite(f64::from(current_stock))
            });
        }

        Ok(StockAtPrice::Finite(self.finite_stock_at_price(target_price)?))
    }

    /// Inverse for the non-flat case. Callers must have ruled out
    /// `is_flat()` already; the pricing engine does so on its first branch.
    pub(crate) fn finite_stock_at_price(&self, target_price: f64) -> MarketResult<f64> {
        if target_price <= 0.0 || self.base_price <= 0.0 {
            return Err(MarketError::InvalidPriceDomain {
                target: target_price,
                base_price: self.base_price,
            });
        }
        debug_assert!(!self.is_flat());
        Ok(-((target_price / self.base_price).ln() / self.vol_factor().ln()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
