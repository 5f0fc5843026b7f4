//! # bazaar-core: Pure Market Logic for Bazaar
//!
//! This crate is the **heart** of Bazaar, a virtual commodity market whose
//! unit prices move inversely with stock along an exponential curve. All of
//! it is pure logic with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Bazaar Architecture                            │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │          Orchestration layer (NOT in this repo)               │  │
//! │  │   command parsing ─► player funds/inventory ─► persistence    │  │
//! │  └────────────────────────────┬──────────────────────────────────┘  │
//! │                               │                                     │
//! │  ┌────────────────────────────▼──────────────────────────────────┐  │
//! │  │              ★ bazaar-core (THIS CRATE) ★                     │  │
//! │  │                                                               │  │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌───────────────┐      │  │
//! │  │  │  curve  │ │ pricing │ │ catalog  │ │  transaction  │      │  │
//! │  │  │  unit   │ │  batch  │ │ entries  │ │  Status       │      │  │
//! │  │  │  price  │ │  sums   │ │ registry │ │  lifecycle    │      │  │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └───────────────┘      │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`curve`] - the exponential price curve and its inverse
//! - [`pricing`] - closed-form batch totals with clamp-aware range splitting
//! - [`catalog`] - good configuration, normalization, stock, and the registry
//! - [`transaction`] - purchase/sale attempts and their status lifecycle
//! - [`money`] - integer-cents currency and sales tax
//! - [`error`] - typed domain errors
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same inputs, same total - always
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Closed Forms**: batch totals are geometric-series sums, never
//!    unit-by-unit simulation
//! 4. **Self-Healing Config**: bad catalog rows are corrected and logged,
//!    never fatal
//! 5. **Explicit Errors**: caller contract violations are typed errors,
//!    never NaN or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::catalog::{CatalogEntry, GoodConfig};
//!
//! let entry = CatalogEntry::new(GoodConfig {
//!     id: 1,
//!     name: "iron".into(),
//!     alias: None,
//!     purchasable: true,
//!     sellable: true,
//!     base_price: 100.0,
//!     price_floor: 0.01,
//!     price_ceiling: 10_000.0,
//!     stock_floor: 0,
//!     stock_ceiling: 1000,
//!     stock: 100,
//!     volatility: 500, // vol_factor = 1.05
//!     sales_tax: 0,
//! });
//!
//! // Buying 10 units walks the price up as stock drains:
//! // the total is the sum of ten different unit prices.
//! let cost = entry.purchase_price(10).unwrap();
//! assert_eq!(cost.cents(), 956);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod curve;
pub mod error;
pub mod money;
pub mod pricing;
pub mod transaction;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{validate_and_normalize, Catalog, CatalogEntry, Correction, GoodConfig};
pub use curve::{Direction, PriceCurve, StockAtPrice};
pub use error::{MarketError, MarketResult};
pub use money::{Money, SalesTax};
pub use pricing::batch_price;
pub use transaction::{Status, Transaction, TransactionType};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Divisor turning the integer `volatility` into a per-unit multiplicative
/// factor: `vol_factor = 1 + volatility / VOLATILITY_SCALE`.
///
/// ## Why a constant?
/// Volatility is persisted as a small integer so catalog rows stay
/// human-editable; the scale pins down what that integer means everywhere.
pub const VOLATILITY_SCALE: i32 = 10_000;
