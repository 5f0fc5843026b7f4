//! # Batch Pricing
//!
//! Computes the total value of moving stock across a whole batch: the sum of
//! `unit_price(s)` for every integer stock level `s` the transaction touches,
//! in closed form rather than unit-by-unit simulation.
//!
//! ## Why a Closed Form?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Buying 10 units at stock 100 walks the stock down through          │
//! │  100, 99, ..., 91 - and the unit price rises at every step.         │
//! │                                                                     │
//! │  total = Σ unit_price(s)   for s in [91, 100]      ← what we want   │
//! │  total ≠ 10 × unit_price(100)                      ← naive + wrong  │
//! │                                                                     │
//! │  Where nothing clamps, that sum is a finite geometric series:       │
//! │      lowPrice × (1 - r^n) / (1 - r),   r = 1 / vol_factor           │
//! │                                                                     │
//! │  Where a clamp cuts through the range, the sum is piecewise:        │
//! │  flat on the clamped side, geometric on the other. Each call        │
//! │  resolves at most one boundary and recurses on the remainder, so    │
//! │  the recursion depth is bounded by the number of clamps (4).        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Branch Order
//! Evaluated top to bottom, first match wins:
//! 1. volatility 0              → flat at the *current* stock's unit price
//! 2. range at/below stock floor   → flat at `unit_price(stock_floor)`
//! 3. range at/above stock ceiling → flat at `unit_price(stock_ceiling)`
//! 4. range straddles stock floor   → flat head + recurse above the floor
//! 5. range straddles stock ceiling → flat tail + recurse below the ceiling
//! 6. price-clamp handling on the remaining in-bounds range:
//!    a. whole range at/below price floor   → numTerms × price_floor
//!    b. whole range at/above price ceiling → numTerms × price_ceiling
//!    c. straddles price floor   → flat tail + recurse (boundary via
//!       `floor(stock_at_price(price_floor))`)
//!    d. straddles price ceiling → flat head + recurse (boundary via
//!       `ceil(stock_at_price(price_ceiling))`)
//!    e. fully unclamped → geometric series
//!
//! Callers round the accumulated sum once, at the top level, via
//! `Money::from_f64_rounded`.

use crate::curve::PriceCurve;
use crate::error::MarketResult;

/// Total price for the batch of stock levels between `start_stock` and
/// `end_stock`, both inclusive, in either order.
///
/// `current_stock` only matters for the flat-curve branch, where the price
/// never varies with level and the entry's current unit price stands in for
/// the whole range.
///
/// Returns the raw (unrounded) sum; see `CatalogEntry::purchase_price` /
/// `sale_price` for the currency boundary.
pub fn batch_price(
    curve: &PriceCurve,
    current_stock: i32,
    start_stock: i32,
    end_stock: i32,
) -> MarketResult<f64> {
    let low = start_stock.min(end_stock);
    let high = start_stock.max(end_stock);
    // i64 so that a floor-to-ceiling range over the sentinel bounds cannot
    // overflow
    let num_terms = (i64::from(high) - i64::from(low) + 1) as f64;

    // 1. Flat curve: every unit is worth the same.
    if curve.is_flat() {
        return Ok(num_terms * curve.unit_price(current_stock));
    }

    // 2. Entire range at or below the stock floor: price plateau.
    if high <= curve.stock_floor {
        return Ok(num_terms * curve.unit_price(curve.stock_floor));
    }

    // 3. Entire range at or above the stock ceiling.
    if low >= curve.stock_ceiling {
        return Ok(num_terms * curve.unit_price(curve.stock_ceiling));
    }

    // 4. Range straddles the stock floor: flat below it, recurse above.
    if low < curve.stock_floor {
        let flat_terms = (i64::from(curve.stock_floor) - i64::from(low) + 1) as f64;
        let flat = flat_terms * curve.unit_price(curve.stock_floor);
        return Ok(flat + batch_price(curve, current_stock, curve.stock_floor + 1, high)?);
    }

    // 5. Range straddles the stock ceiling: flat above it, recurse below.
    if high > curve.stock_ceiling {
        let flat_terms = (i64::from(high) - i64::from(curve.stock_ceiling) + 1) as f64;
        let flat = flat_terms * curve.unit_price(curve.stock_ceiling);
        return Ok(flat + batch_price(curve, current_stock, low, curve.stock_ceiling - 1)?);
    }

    // Lowest stock carries the highest price and vice versa. The straddle
    // checks need the price-unclamped values: a fully clamped endpoint can
    // never sit strictly beyond a clamp, which would leave 6c/6d
    // unreachable.
    let low_price = curve.raw_price(low);
    let high_price = curve.raw_price(high);

    // 6a. Whole range at or below the price floor.
    if low_price <= curve.price_floor {
        return Ok(num_terms * curve.price_floor);
    }

    // 6b. Whole range at or above the price ceiling.
    if high_price >= curve.price_ceiling {
        return Ok(num_terms * curve.price_ceiling);
    }

    // 6c. Price floor cut through the range: the high-stock tail is floored.
    if high_price < curve.price_floor {
        let boundary = curve.finite_stock_at_price(curve.price_floor)?.floor() as i32;
        let flat_terms = (i64::from(high) - i64::from(boundary) + 1) as f64;
        let mut total = flat_terms * curve.price_floor;
        if boundary > low {
            total += batch_price(curve, current_stock, low, boundary - 1)?;
        }
        return Ok(total);
    }

    // 6d. Price ceiling cut through the range: the low-stock head is capped.
    if low_price > curve.price_ceiling {
        let boundary = curve.finite_stock_at_price(curve.price_ceiling)?.ceil() as i32;
        let flat_terms = (i64::from(boundary) - i64::from(low) + 1) as f64;
        let mut total = flat_terms * curve.price_ceiling;
        if boundary < high {
            total += batch_price(curve, current_stock, boundary + 1, high)?;
        }
        return Ok(total);
    }

    // 6e. Fully unclamped: finite geometric series, first term `low_price`,
    // common ratio 1/vol_factor.
    let ratio = 1.0 / curve.vol_factor();
    Ok(low_price * (1.0 - ratio.powf(num_terms)) / (1.0 - ratio))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> PriceCurve {
        PriceCurve {
            base_price: 100.0,
            price_floor: 0.01,
            price_ceiling: 10_000.0,
            stock_floor: 0,
            stock_ceiling: 1000,
            volatility: 500, // vol_factor 1.05
        }
    }

    /// Unit-by-unit reference sum. Slow but obviously correct wherever no
    /// price clamp cuts *strictly inside* the range (the split rule charges
    /// the boundary level at the clamped price, see branch 6c/6d docs).
    fn brute_force(c: &PriceCurve, start: i32, end: i32) -> f64 {
        let (lo, hi) = (start.min(end), start.max(end));
        (lo..=hi).map(|s| c.unit_price(s)).sum()
    }

    #[test]
    fn test_single_unit_equals_unit_price() {
        let c = curve();
        let total = batch_price(&c, 100, 100, 100).unwrap();
        assert!((total - c.unit_price(100)).abs() < 1e-12);
    }

    #[test]
    fn test_order_of_endpoints_is_irrelevant() {
        let c = curve();
        let down = batch_price(&c, 100, 100, 91).unwrap();
        let up = batch_price(&c, 100, 91, 100).unwrap();
        assert_eq!(down, up);
    }

    /// The concrete scenario: ten strictly increasing terms, not
    /// 10 × unit_price(100).
    #[test]
    fn test_reference_scenario_ten_units() {
        let c = curve();
        let total = batch_price(&c, 100, 100, 91).unwrap();
        assert!((total - 9.56485).abs() < 1e-4, "got {total}");
        assert!((total - brute_force(&c, 91, 100)).abs() < 1e-9);
        // Decisively not the naive flat estimate
        assert!((total - 10.0 * c.unit_price(100)).abs() > 1.0);
    }

    /// Flat-curve invariant: batch == numTerms × clamped base price for any
    /// endpoints.
    #[test]
    fn test_flat_curve_invariant() {
        let c = PriceCurve { volatility: 0, ..curve() };
        for (s1, s2) in [(0, 0), (10, 60), (60, 10), (-500, 500), (990, 1020)] {
            let n = (i64::from(s1.max(s2)) - i64::from(s1.min(s2)) + 1) as f64;
            let total = batch_price(&c, 30, s1, s2).unwrap();
            assert_eq!(total, n * 100.0, "range {s1}..{s2}");
        }

        // Clamped flat curve: base price above the ceiling prices at the
        // ceiling
        let capped = PriceCurve {
            volatility: 0,
            price_ceiling: 50.0,
            ..curve()
        };
        assert_eq!(batch_price(&capped, 30, 10, 14).unwrap(), 5.0 * 50.0);
    }

    /// Closed form agrees with the unit-by-unit sum wherever the per-level
    /// price equals the charged price (everything except price-clamp
    /// straddles).
    #[test]
    fn test_matches_brute_force() {
        let c = curve();
        for (start, end) in [
            (40, 60),    // fully unclamped
            (-10, 20),   // straddles the stock floor
            (990, 1010), // straddles the stock ceiling
            (-50, -10),  // entirely below the stock floor
            (1005, 1020),// entirely above the stock ceiling
            (0, 1000),   // the whole clamped band
        ] {
            let total = batch_price(&c, 100, start, end).unwrap();
            let reference = brute_force(&c, start, end);
            assert!(
                (total - reference).abs() < 1e-6 * reference.max(1.0),
                "range {start}..{end}: {total} vs {reference}"
            );
        }
    }

    /// Range additivity: splitting at any midpoint changes nothing.
    ///
    /// Exact away from price-clamp boundaries; the split rule's boundary
    /// level (see 6c/6d) is exercised by the dedicated straddle tests.
    #[test]
    fn test_range_additivity() {
        let c = curve();
        for (low, high) in [(40, 60), (-10, 20), (70, 90), (990, 1010)] {
            let whole = batch_price(&c, 100, low, high).unwrap();
            for mid in low..high {
                let left = batch_price(&c, 100, low, mid).unwrap();
                let right = batch_price(&c, 100, mid + 1, high).unwrap();
                assert!(
                    (whole - (left + right)).abs() < 1e-6 * whole.max(1.0),
                    "range {low}..{high} split at {mid}"
                );
            }
        }
    }

    /// Clamp saturation below the stock floor: every term is priced at the
    /// floor's unit price.
    #[test]
    fn test_stock_clamp_saturation() {
        let c = curve();
        let total = batch_price(&c, 100, -30, -11).unwrap();
        assert_eq!(total, 20.0 * c.unit_price(c.stock_floor));

        let total = batch_price(&c, 100, 1050, 1069).unwrap();
        assert_eq!(total, 20.0 * c.unit_price(c.stock_ceiling));
    }

    /// Whole range saturated at the price floor (branch 6a): at stock 200
    /// the raw price is far below the floor of 2.0.
    #[test]
    fn test_price_floor_saturation() {
        let c = PriceCurve { price_floor: 2.0, ..curve() };
        let total = batch_price(&c, 100, 200, 210).unwrap();
        assert_eq!(total, 11.0 * 2.0);
    }

    /// Price floor cuts through the range: unit_price crosses 2.0 at stock
    /// ≈ 80.18, so [80, 90] is floored and [70, 79] stays geometric.
    #[test]
    fn test_price_floor_straddle() {
        let c = PriceCurve { price_floor: 2.0, ..curve() };
        let total = batch_price(&c, 100, 70, 90).unwrap();
        let expected = 11.0 * 2.0 + brute_force(&c, 70, 79);
        assert!((total - expected).abs() < 1e-9, "{total} vs {expected}");
    }

    /// Price ceiling cuts through the range: unit_price crosses 50.0 at
    /// stock ≈ 14.21, so [5, 15] is capped and [16, 25] stays geometric.
    #[test]
    fn test_price_ceiling_straddle() {
        let c = PriceCurve { price_ceiling: 50.0, ..curve() };
        let total = batch_price(&c, 100, 5, 25).unwrap();
        let expected = 11.0 * 50.0 + brute_force(&c, 16, 25);
        assert!((total - expected).abs() < 1e-9, "{total} vs {expected}");
    }

    /// A range ending exactly at the clamp boundary leaves an empty
    /// remainder; the split must not manufacture extra terms for it.
    #[test]
    fn test_empty_remainder_after_split() {
        let c = PriceCurve { price_ceiling: 50.0, ..curve() };
        // Boundary is ceil(14.21) = 15, so [5, 15] is entirely flat
        let total = batch_price(&c, 100, 5, 15).unwrap();
        assert_eq!(total, 11.0 * 50.0);
    }

    /// A zero base price floors every unit price immediately; no logarithm
    /// is ever evaluated, so no domain error escapes.
    #[test]
    fn test_zero_base_price_is_total() {
        let c = PriceCurve {
            base_price: 0.0,
            price_floor: 0.0,
            ..curve()
        };
        assert_eq!(batch_price(&c, 100, 40, 60).unwrap(), 0.0);
    }
}
