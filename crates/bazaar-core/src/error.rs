//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  bazaar-core errors (this file)                                     │
//! │  └── MarketError   - precondition violations + catalog misses       │
//! │                                                                     │
//! │  Everything else in the engine is total: clamping, the geometric    │
//! │  series, and stock mutation cannot fail on any in-domain input.     │
//! │  Bad *configuration* is not an error either - it is silently        │
//! │  corrected at construction time and reported via tracing (see       │
//! │  `catalog::validate_and_normalize`).                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error variants (quantity, target price, ...)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Market Error
// =============================================================================

/// Market engine errors.
///
/// These represent contract violations by the caller (the orchestration
/// layer), never internal arithmetic failures.
#[derive(Debug, Error)]
pub enum MarketError {
    /// A pricing or stock operation was called with a non-positive quantity.
    ///
    /// The orchestrator is expected to validate player input before calling
    /// the core; this variant is the backstop for when it does not.
    #[error("quantity must be positive, got {requested}")]
    InvalidQuantity { requested: i32 },

    /// The price-curve inverse was asked for a price outside the logarithm's
    /// domain (target or base price not strictly positive).
    ///
    /// The original formula `-ln(target / base) / ln(vol_factor)` silently
    /// produces NaN/infinity here; we refuse instead.
    #[error("price curve inverse undefined for target {target} (base price {base_price})")]
    InvalidPriceDomain { target: f64, base_price: f64 },

    /// No good in the catalog matches the given id, name, or alias.
    #[error("good not found: {0}")]
    GoodNotFound(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with MarketError.
pub type MarketResult<T> = Result<T, MarketError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MarketError::InvalidQuantity { requested: -3 };
        assert_eq!(err.to_string(), "quantity must be positive, got -3");

        let err = MarketError::InvalidPriceDomain {
            target: 0.0,
            base_price: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "price curve inverse undefined for target 0 (base price 100)"
        );

        let err = MarketError::GoodNotFound("cobalt".to_string());
        assert_eq!(err.to_string(), "good not found: cobalt");
    }
}
