//! # Catalog
//!
//! The tradeable goods: configuration, self-healing normalization, per-good
//! pricing and stock operations, and the in-memory registry that owns the
//! entries for the lifetime of the process.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  persisted GoodConfig                                               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  validate_and_normalize ──► corrections logged via tracing::warn    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  CatalogEntry (owned by Catalog)                                    │
//! │       │                                                             │
//! │       ├── purchase_price(n) ──► batch_price ──► Money               │
//! │       ├── sale_price(n) ──► batch_price ──► deduct tax ──► Money    │
//! │       ├── has_enough_stock / has_room_for_stock (advisory)          │
//! │       └── add_stock / subtract_stock (clamped, infallible)          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Self-Healing Configuration
//! Out-of-range constructor input is never rejected: ceilings are widened to
//! meet the current stock, floors lowered, the tax clamped. A market must
//! not refuse to boot over one bad row, but the correction must not vanish
//! either - `validate_and_normalize` returns the full list and the
//! constructor logs each one.
//!
//! ## Concurrency
//! `stock` is the only mutable state here. The engine takes no locks; the
//! orchestrator must serialize the check-then-mutate sequence per entry
//! (`has_*` followed by `add_stock`/`subtract_stock`). Holding the whole
//! `Catalog` behind one exclusive lock is sufficient, since `get_mut` hands
//! out `&mut` and the borrow covers the whole sequence.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::curve::PriceCurve;
use crate::error::{MarketError, MarketResult};
use crate::money::{Money, SalesTax};
use crate::pricing::batch_price;

// =============================================================================
// Configuration
// =============================================================================

/// Persisted configuration of one tradeable good.
///
/// `stock_floor` / `stock_ceiling` use `i32::MIN` / `i32::MAX` as exact
/// "unbounded" sentinels; they must round-trip unchanged through the
/// persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodConfig {
    /// Unique catalog id (immutable once registered).
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Optional short alias for lookups.
    pub alias: Option<String>,
    /// Whether players may buy this good from the market.
    pub purchasable: bool,
    /// Whether players may sell this good to the market.
    pub sellable: bool,
    /// Price at stock level zero (before clamping).
    pub base_price: f64,
    /// Hard lower bound on the unit price.
    pub price_floor: f64,
    /// Hard upper bound on the unit price.
    pub price_ceiling: f64,
    /// Hard lower bound on stock; `i32::MIN` means unbounded.
    pub stock_floor: i32,
    /// Hard upper bound on stock; `i32::MAX` means unbounded.
    pub stock_ceiling: i32,
    /// Current stock level.
    pub stock: i32,
    /// Exponential rate driver, scaled by `VOLATILITY_SCALE`; 0 = flat.
    pub volatility: i32,
    /// Whole-percent tax deducted from sale proceeds.
    pub sales_tax: i32,
}

/// One silent repair applied to a `GoodConfig` during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Correction {
    SalesTaxClamped { from: i32, to: i32 },
    StockCeilingRaised { from: i32, to: i32 },
    StockFloorLowered { from: i32, to: i32 },
    PriceCeilingRaised { from: f64, to: f64 },
    PriceCeilingCapped { from: f64, to: f64 },
    BasePriceRaised { from: f64, to: f64 },
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correction::SalesTaxClamped { from, to } => {
                write!(f, "sales tax clamped from {from} to {to}")
            }
            Correction::StockCeilingRaised { from, to } => {
                write!(f, "stock ceiling raised from {from} to {to} to meet stock")
            }
            Correction::StockFloorLowered { from, to } => {
                write!(f, "stock floor lowered from {from} to {to} to meet stock")
            }
            Correction::PriceCeilingRaised { from, to } => {
                write!(f, "price ceiling raised from {from} to {to} to meet floor")
            }
            Correction::PriceCeilingCapped { from, to } => {
                write!(f, "price ceiling capped from {from} to {to}")
            }
            Correction::BasePriceRaised { from, to } => {
                write!(f, "base price raised from {from} to {to}")
            }
        }
    }
}

/// Repairs out-of-range configuration instead of rejecting it.
///
/// Pure: returns the normalized config together with every correction made,
/// so callers can log them. After this pass the following hold:
/// `stock_ceiling >= stock >= stock_floor`, `price_ceiling >= price_floor`,
/// `price_ceiling` finite, `base_price >= 0`, `sales_tax` in `[0, 100]`.
pub fn validate_and_normalize(mut config: GoodConfig) -> (GoodConfig, Vec<Correction>) {
    let mut corrections = Vec::new();

    let clamped_tax = config.sales_tax.clamp(0, 100);
    if clamped_tax != config.sales_tax {
        corrections.push(Correction::SalesTaxClamped {
            from: config.sales_tax,
            to: clamped_tax,
        });
        config.sales_tax = clamped_tax;
    }

    if config.stock_ceiling < config.stock {
        corrections.push(Correction::StockCeilingRaised {
            from: config.stock_ceiling,
            to: config.stock,
        });
        config.stock_ceiling = config.stock;
    }

    if config.stock_floor > config.stock {
        corrections.push(Correction::StockFloorLowered {
            from: config.stock_floor,
            to: config.stock,
        });
        config.stock_floor = config.stock;
    }

    if config.price_ceiling < config.price_floor {
        corrections.push(Correction::PriceCeilingRaised {
            from: config.price_ceiling,
            to: config.price_floor,
        });
        config.price_ceiling = config.price_floor;
    }

    if !config.price_ceiling.is_finite() {
        corrections.push(Correction::PriceCeilingCapped {
            from: config.price_ceiling,
            to: f64::MAX,
        });
        config.price_ceiling = f64::MAX;
    }

    if config.base_price < 0.0 {
        corrections.push(Correction::BasePriceRaised {
            from: config.base_price,
            to: 0.0,
        });
        config.base_price = 0.0;
    }

    (config, corrections)
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// One good in the market: normalized configuration plus its mutable stock.
///
/// Constructed once from persisted values and owned by the `Catalog` for the
/// lifetime of the process. Invariants are enforced by the normalization
/// pass at construction and by clamping in the stock mutators; they are
/// never re-checked elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    id: u32,
    name: String,
    alias: Option<String>,
    purchasable: bool,
    sellable: bool,
    base_price: f64,
    price_floor: f64,
    price_ceiling: f64,
    stock_floor: i32,
    stock_ceiling: i32,
    stock: i32,
    volatility: i32,
    sales_tax: SalesTax,
}

impl CatalogEntry {
    /// Builds an entry from (possibly dirty) persisted configuration,
    /// logging every correction the normalization pass had to make.
    pub fn new(config: GoodConfig) -> Self {
        let (config, corrections) = validate_and_normalize(config);
        for correction in &corrections {
            warn!(good = %config.name, id = config.id, %correction, "corrected bad catalog config");
        }

        CatalogEntry {
            id: config.id,
            name: config.name,
            alias: config.alias,
            purchasable: config.purchasable,
            sellable: config.sellable,
            base_price: config.base_price,
            price_floor: config.price_floor,
            price_ceiling: config.price_ceiling,
            stock_floor: config.stock_floor,
            stock_ceiling: config.stock_ceiling,
            stock: config.stock,
            volatility: config.volatility,
            sales_tax: SalesTax::from_percent(config.sales_tax),
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    #[inline]
    pub fn is_purchasable(&self) -> bool {
        self.purchasable
    }

    #[inline]
    pub fn is_sellable(&self) -> bool {
        self.sellable
    }

    #[inline]
    pub fn stock(&self) -> i32 {
        self.stock
    }

    #[inline]
    pub fn sales_tax(&self) -> SalesTax {
        self.sales_tax
    }

    /// Snapshot of the current state as persistable configuration.
    pub fn to_config(&self) -> GoodConfig {
        GoodConfig {
            id: self.id,
            name: self.name.clone(),
            alias: self.alias.clone(),
            purchasable: self.purchasable,
            sellable: self.sellable,
            base_price: self.base_price,
            price_floor: self.price_floor,
            price_ceiling: self.price_ceiling,
            stock_floor: self.stock_floor,
            stock_ceiling: self.stock_ceiling,
            stock: self.stock,
            volatility: self.volatility,
            sales_tax: i32::from(self.sales_tax.percent()),
        }
    }

    /// The good's pricing parameters, snapshotted for curve evaluation.
    pub fn curve(&self) -> PriceCurve {
        PriceCurve {
            base_price: self.base_price,
            price_floor: self.price_floor,
            price_ceiling: self.price_ceiling,
            stock_floor: self.stock_floor,
            stock_ceiling: self.stock_ceiling,
            volatility: self.volatility,
        }
    }

    // -------------------------------------------------------------------------
    // Pricing
    // -------------------------------------------------------------------------

    /// Total cost of purchasing `amount` units at the current stock level.
    ///
    /// Buying consumes stock, and lower stock means higher unit prices, so
    /// the batch runs from the current stock down to `stock - amount + 1`.
    ///
    /// ## Example
    /// ```rust
    /// use bazaar_core::catalog::{CatalogEntry, GoodConfig};
    /// use bazaar_core::money::Money;
    ///
    /// let entry = CatalogEntry::new(GoodConfig {
    ///     id: 1,
    ///     name: "iron".into(),
    ///     alias: None,
    ///     purchasable: true,
    ///     sellable: true,
    ///     base_price: 100.0,
    ///     price_floor: 0.01,
    ///     price_ceiling: 10_000.0,
    ///     stock_floor: 0,
    ///     stock_ceiling: 1000,
    ///     stock: 100,
    ///     volatility: 500,
    ///     sales_tax: 0,
    /// });
    ///
    /// // 100 × 1.05^-100 ≈ 0.7604, rounded to cents
    /// assert_eq!(entry.purchase_price(1).unwrap(), Money::from_cents(76));
    /// ```
    pub fn purchase_price(&self, amount: i32) -> MarketResult<Money> {
        ensure_positive(amount)?;
        let end = self.stock.saturating_sub(amount - 1);
        let total = batch_price(&self.curve(), self.stock, self.stock, end)?;
        Ok(Money::from_f64_rounded(total))
    }

    /// Total proceeds of selling `amount` units at the current stock level,
    /// after sales tax.
    ///
    /// Selling replenishes stock, so the batch runs from the current stock
    /// up to `stock + amount - 1`. Tax is deducted before the currency
    /// rounding boundary.
    pub fn sale_price(&self, amount: i32) -> MarketResult<Money> {
        ensure_positive(amount)?;
        let end = self.stock.saturating_add(amount - 1);
        let total = batch_price(&self.curve(), self.stock, self.stock, end)?;
        Ok(Money::from_f64_rounded(self.sales_tax.deduct(total)))
    }

    // -------------------------------------------------------------------------
    // Stock
    // -------------------------------------------------------------------------

    /// Adds `qty` units of stock, clamped into `[stock_floor, stock_ceiling]`.
    /// Always succeeds; clamping absorbs overflow silently. Returns the new
    /// stock level.
    pub fn add_stock(&mut self, qty: i32) -> i32 {
        self.stock = self
            .stock
            .saturating_add(qty)
            .clamp(self.stock_floor, self.stock_ceiling);
        self.stock
    }

    /// Removes `qty` units of stock, clamped into
    /// `[stock_floor, stock_ceiling]`. Always succeeds. Returns the new
    /// stock level.
    pub fn subtract_stock(&mut self, qty: i32) -> i32 {
        self.stock = self
            .stock
            .saturating_sub(qty)
            .clamp(self.stock_floor, self.stock_ceiling);
        self.stock
    }

    /// Advisory: would removing `qty` units keep stock at or above the
    /// floor? Always true when the floor is the unbounded sentinel.
    ///
    /// Check-then-mutate is NOT atomic here; the orchestrator must hold its
    /// per-entry lock across this call and the mutation that follows.
    pub fn has_enough_stock(&self, qty: i32) -> bool {
        self.stock_floor == i32::MIN
            || i64::from(self.stock) - i64::from(qty) >= i64::from(self.stock_floor)
    }

    /// Advisory: would adding `qty` units keep stock at or below the
    /// ceiling? Always true when the ceiling is the unbounded sentinel.
    pub fn has_room_for_stock(&self, qty: i32) -> bool {
        self.stock_ceiling == i32::MAX
            || i64::from(self.stock) + i64::from(qty) <= i64::from(self.stock_ceiling)
    }
}

#[inline]
fn ensure_positive(quantity: i32) -> MarketResult<()> {
    if quantity <= 0 {
        return Err(MarketError::InvalidQuantity {
            requested: quantity,
        });
    }
    Ok(())
}

// =============================================================================
// Catalog Registry
// =============================================================================

/// The in-memory registry of all tradeable goods, keyed by catalog id.
///
/// Entries live for the whole process; there is deliberately no removal.
/// The registry itself is not synchronized - wrap it in whatever lock the
/// orchestration layer uses for command processing.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: BTreeMap<u32, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Registers an entry, replacing (and returning) any previous entry
    /// with the same id.
    pub fn insert(&mut self, entry: CatalogEntry) -> Option<CatalogEntry> {
        debug!(good = %entry.name(), id = entry.id(), "registered catalog entry");
        self.entries.insert(entry.id(), entry)
    }

    /// Looks an entry up by id.
    pub fn get(&self, id: u32) -> MarketResult<&CatalogEntry> {
        self.entries
            .get(&id)
            .ok_or_else(|| MarketError::GoodNotFound(format!("#{id}")))
    }

    /// Looks an entry up by id for mutation (stock changes).
    pub fn get_mut(&mut self, id: u32) -> MarketResult<&mut CatalogEntry> {
        self.entries
            .get_mut(&id)
            .ok_or_else(|| MarketError::GoodNotFound(format!("#{id}")))
    }

    /// Resolves a player-supplied name: matches the display name or the
    /// alias, case-insensitively.
    pub fn resolve(&self, query: &str) -> MarketResult<&CatalogEntry> {
        self.entries
            .values()
            .find(|entry| {
                entry.name().eq_ignore_ascii_case(query)
                    || entry
                        .alias()
                        .is_some_and(|alias| alias.eq_ignore_ascii_case(query))
            })
            .ok_or_else(|| MarketError::GoodNotFound(query.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
