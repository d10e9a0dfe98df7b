//! # Pricing Rules
//!
//! Rules turn a [`Purchase`] into a total, consulting the [`Catalog`] for
//! unit prices. Rules compose by decoration.
//!
//! ## Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   BulkDiscount { threshold: ¥100.00, rebate: ¥10.00 }                  │
//! │     │                                                                   │
//! │     │ inner.calculate_total(..) ──► subtotal                           │
//! │     │ subtotal ≥ threshold ? subtotal − rebate : subtotal              │
//! │     ▼                                                                   │
//! │   PromotionPricing { discounts: STRAWBERRY → 0.8 }                     │
//! │     │                                                                   │
//! │     │ Σ price × qty × rate   (exact)                                   │
//! │     │ round half-up to fen   (once)                                    │
//! │     ▼                                                                   │
//! │   Catalog + Purchase                                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use grocer_core::catalog::Catalog;
//! use grocer_core::discount::DiscountConfiguration;
//! use grocer_core::purchase::Purchase;
//! use grocer_core::rule::{BulkDiscount, PricingRule, PromotionPricing};
//!
//! let catalog = Catalog::with_default_fruits();
//! let mut purchase = Purchase::new();
//! purchase.add_quantity(&catalog, "APPLE", 1).unwrap();
//! purchase.add_quantity(&catalog, "STRAWBERRY", 2).unwrap();
//! purchase.add_quantity(&catalog, "MANGO", 1).unwrap();
//!
//! let promotion = PromotionPricing::new(DiscountConfiguration::strawberry_promotion());
//! assert_eq!(promotion.calculate_total(&purchase, &catalog).unwrap().cents(), 4880);
//!
//! let bulk = BulkDiscount::with_defaults(promotion);
//! assert_eq!(bulk.calculate_total(&purchase, &catalog).unwrap().cents(), 4880);
//! ```

use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::discount::DiscountConfiguration;
use crate::error::{CoreError, CoreResult};
use crate::money::{ExactAmount, Money};
use crate::purchase::Purchase;
use crate::types::DiscountRate;
use crate::validation::{validate_positive_amount, ValidationResult};
use crate::{DEFAULT_BULK_REBATE, DEFAULT_BULK_THRESHOLD};

// =============================================================================
// Pricing Rule Trait
// =============================================================================

/// A pure function from purchase to total.
///
/// Calling `calculate_total` twice on an unchanged purchase and catalog
/// returns the same amount; rules hold no mutable state.
pub trait PricingRule {
    /// Prices `purchase` against `catalog`.
    ///
    /// ## Errors
    /// [`CoreError::ProductNotFound`] if the purchase references a product
    /// that has been removed from `catalog`.
    fn calculate_total(&self, purchase: &Purchase, catalog: &Catalog) -> CoreResult<Money>;

    /// Human-readable description of the rule.
    fn description(&self) -> String;

    /// Whether the rule has anything to price.
    fn is_applicable(&self, purchase: &Purchase) -> bool {
        !purchase.is_empty()
    }
}

impl<R: PricingRule + ?Sized> PricingRule for &R {
    fn calculate_total(&self, purchase: &Purchase, catalog: &Catalog) -> CoreResult<Money> {
        (**self).calculate_total(purchase, catalog)
    }

    fn description(&self) -> String {
        (**self).description()
    }

    fn is_applicable(&self, purchase: &Purchase) -> bool {
        (**self).is_applicable(purchase)
    }
}

impl<R: PricingRule + ?Sized> PricingRule for Box<R> {
    fn calculate_total(&self, purchase: &Purchase, catalog: &Catalog) -> CoreResult<Money> {
        (**self).calculate_total(purchase, catalog)
    }

    fn description(&self) -> String {
        (**self).description()
    }

    fn is_applicable(&self, purchase: &Purchase) -> bool {
        (**self).is_applicable(purchase)
    }
}

// =============================================================================
// Base Computation
// =============================================================================

/// Sums `price × quantity × rate` over the purchase and rounds once.
///
/// Line items are never rounded individually.
fn sum_lines(
    purchase: &Purchase,
    catalog: &Catalog,
    discounts: Option<&DiscountConfiguration>,
) -> CoreResult<Money> {
    let mut total = ExactAmount::zero();

    for (product_id, quantity) in purchase.iter() {
        let product = catalog
            .get_product(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let rate = discounts
            .map(|d| d.get_discount_rate(product_id))
            .unwrap_or(DiscountRate::FULL_PRICE);

        trace!(product_id, quantity, price = %product.price(), rate = %rate, "Pricing line");
        total = total.checked_add(ExactAmount::line(product.price(), quantity, rate)?)?;
    }

    Ok(total.round()?)
}

// =============================================================================
// Standard Pricing
// =============================================================================

/// List prices, no discounts.
///
/// ## Example
/// ```rust
/// use grocer_core::catalog::Catalog;
/// use grocer_core::purchase::Purchase;
/// use grocer_core::rule::{PricingRule, StandardPricing};
///
/// let catalog = Catalog::with_default_fruits();
/// let mut purchase = Purchase::new();
/// purchase.add_quantity(&catalog, "APPLE", 2).unwrap();
/// purchase.add_quantity(&catalog, "STRAWBERRY", 1).unwrap();
///
/// let total = StandardPricing.calculate_total(&purchase, &catalog).unwrap();
/// assert_eq!(total.cents(), 2900);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardPricing;

impl PricingRule for StandardPricing {
    fn calculate_total(&self, purchase: &Purchase, catalog: &Catalog) -> CoreResult<Money> {
        sum_lines(purchase, catalog, None)
    }

    fn description(&self) -> String {
        "Standard pricing - list prices, no discounts".to_string()
    }
}

// =============================================================================
// Promotion Pricing
// =============================================================================

/// Per-product multipliers from a [`DiscountConfiguration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionPricing {
    discounts: DiscountConfiguration,
}

impl PromotionPricing {
    pub fn new(discounts: DiscountConfiguration) -> Self {
        PromotionPricing { discounts }
    }

    pub fn discounts(&self) -> &DiscountConfiguration {
        &self.discounts
    }
}

impl PricingRule for PromotionPricing {
    fn calculate_total(&self, purchase: &Purchase, catalog: &Catalog) -> CoreResult<Money> {
        sum_lines(purchase, catalog, Some(&self.discounts))
    }

    fn description(&self) -> String {
        format!("Promotion pricing - {}", self.discounts)
    }
}

// =============================================================================
// Bulk Discount Decorator
// =============================================================================

/// Takes a flat rebate off any inner rule's total once it reaches a
/// threshold.
///
/// ## Boundary
/// The comparison is inclusive. With threshold ¥100.00 and rebate ¥10.00:
/// ```text
/// subtotal  ¥99.99 → ¥99.99   (no rebate)
/// subtotal ¥100.00 → ¥90.00
/// subtotal ¥100.01 → ¥90.01
/// ```
///
/// Decorators nest: `BulkDiscount<BulkDiscount<PromotionPricing>>` checks the
/// outer threshold against the inner, already-rebated total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDiscount<R> {
    inner: R,
    threshold: Money,
    rebate: Money,
}

impl<R: PricingRule> BulkDiscount<R> {
    /// Wraps `inner`. Both amounts must be strictly positive.
    pub fn new(inner: R, threshold: Money, rebate: Money) -> ValidationResult<Self> {
        validate_positive_amount("bulk discount threshold", threshold)?;
        validate_positive_amount("bulk discount rebate", rebate)?;

        Ok(BulkDiscount {
            inner,
            threshold,
            rebate,
        })
    }

    /// ¥10.00 off from ¥100.00.
    pub fn with_defaults(inner: R) -> Self {
        BulkDiscount {
            inner,
            threshold: DEFAULT_BULK_THRESHOLD,
            rebate: DEFAULT_BULK_REBATE,
        }
    }

    pub fn threshold(&self) -> Money {
        self.threshold
    }

    pub fn rebate(&self) -> Money {
        self.rebate
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// True when `subtotal` earns the rebate.
    pub fn qualifies(&self, subtotal: Money) -> bool {
        subtotal >= self.threshold
    }
}

impl<R: PricingRule> PricingRule for BulkDiscount<R> {
    fn calculate_total(&self, purchase: &Purchase, catalog: &Catalog) -> CoreResult<Money> {
        let subtotal = self.inner.calculate_total(purchase, catalog)?;

        if self.qualifies(subtotal) {
            let total = subtotal - self.rebate;
            debug!(%subtotal, rebate = %self.rebate, %total, "Bulk discount applied");
            return Ok(total);
        }

        Ok(subtotal)
    }

    fn description(&self) -> String {
        format!(
            "Bulk discount - {}, {} off from {}",
            self.inner.description(),
            self.rebate,
            self.threshold
        )
    }

    fn is_applicable(&self, purchase: &Purchase) -> bool {
        self.inner.is_applicable(purchase)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
