//! # Domain Types
//!
//! Core value types used throughout Grocer.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐            ┌─────────────────────┐            │
//! │  │      Product        │            │    DiscountRate     │            │
//! │  │  ─────────────────  │            │  ─────────────────  │            │
//! │  │  id ("APPLE")       │            │  bps (u32)          │            │
//! │  │  name / local_name  │            │  10000 = 1.0 (full) │            │
//! │  │  price (Money)      │            │   8000 = 0.8        │            │
//! │  │  category           │            └─────────────────────┘            │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both types are immutable once constructed. A price change produces a new
//! `Product` (see [`Product::with_price`]) rather than mutating in place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{decimal_to_scaled, parse_decimal, ExactAmount, Money};
use crate::validation::{
    validate_discount_rate_bps, validate_positive_amount, validate_product_id,
    validate_product_name, validate_quantity, ValidationResult,
};

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount multiplier represented in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.0001 of the list price.
/// 8000 bps = 0.8 (pay 80%, "8折"); 10000 bps = full price.
///
/// The valid range is (0, 10000]: a rate can never be free or a surcharge.
///
/// ## Example
/// ```rust
/// use grocer_core::types::DiscountRate;
///
/// let rate: DiscountRate = "0.85".parse().unwrap();
/// assert_eq!(rate.bps(), 8500);
/// assert_eq!(rate.to_string(), "0.85");
///
/// assert!("0".parse::<DiscountRate>().is_err());
/// assert!("1.2".parse::<DiscountRate>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Basis points in 1.0.
    pub const SCALE: u32 = 10_000;

    /// Decimal places of a rate written as a multiplier.
    pub const DECIMAL_PLACES: u32 = 4;

    /// No discount.
    pub const FULL_PRICE: DiscountRate = DiscountRate(Self::SCALE);

    /// Creates a rate from basis points, rejecting values outside (0, 10000].
    pub fn try_from_bps(bps: u32) -> ValidationResult<Self> {
        validate_discount_rate_bps(i64::from(bps))?;
        Ok(DiscountRate(bps))
    }

    /// Rate for `const` tables; an out-of-range value fails compilation.
    pub(crate) const fn from_bps_const(bps: u32) -> Self {
        assert!(bps > 0 && bps <= Self::SCALE, "discount rate out of range");
        DiscountRate(bps)
    }

    /// Creates a rate from a decimal multiplier such as `0.85`.
    ///
    /// ## Example
    /// ```rust
    /// use grocer_core::types::DiscountRate;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(DiscountRate::from_decimal(Decimal::new(85, 2)).unwrap().bps(), 8500);
    /// assert!(DiscountRate::from_decimal(Decimal::new(12, 1)).is_err());
    /// assert!(DiscountRate::from_decimal(Decimal::new(1, 5)).is_err());
    /// ```
    pub fn from_decimal(value: Decimal) -> ValidationResult<Self> {
        let bps = decimal_to_scaled(value, Self::DECIMAL_PLACES, "discount rate")?;
        validate_discount_rate_bps(bps)?;
        Ok(DiscountRate(bps as u32))
    }

    /// The multiplier as a normalized decimal (`0.8`, `1`).
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(i64::from(self.0), Self::DECIMAL_PLACES).normalize()
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// True when the rate leaves prices unchanged.
    #[inline]
    pub const fn is_full_price(&self) -> bool {
        self.0 == Self::SCALE
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::FULL_PRICE
    }
}

impl TryFrom<u32> for DiscountRate {
    type Error = ValidationError;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        DiscountRate::try_from_bps(bps)
    }
}

impl From<DiscountRate> for u32 {
    fn from(rate: DiscountRate) -> u32 {
        rate.0
    }
}

/// Parses decimal multipliers such as `"0.8"` or `"0.85"` (up to 4 places).
impl FromStr for DiscountRate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiscountRate::from_decimal(parse_decimal(s, "discount rate")?)
    }
}

/// Renders the multiplier as a trimmed decimal: `1`, `0.8`, `0.85`.
impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be priced by the catalog.
///
/// ## Invariants
/// - `id` is non-empty, at most 50 chars of `[A-Za-z0-9_-]`
/// - `name` (and `local_name`, when present) is non-empty
/// - `price` is strictly positive
///
/// ## Example
/// ```rust
/// use grocer_core::money::Money;
/// use grocer_core::types::Product;
///
/// let durian = Product::new("DURIAN", "Durian", Money::from_cents(5000))
///     .unwrap()
///     .with_local_name("榴莲")
///     .unwrap()
///     .with_category("fruit");
///
/// assert_eq!(durian.id(), "DURIAN");
/// assert_eq!(durian.subtotal(2).unwrap().cents(), 10000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    id: String,
    name: String,
    local_name: Option<String>,
    price: Money,
    category: Option<String>,
}

impl Product {
    /// Creates a validated product.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> ValidationResult<Self> {
        let id = id.into();
        let name = name.into();

        validate_product_id(&id)?;
        validate_product_name("name", &name)?;
        validate_positive_amount("price", price)?;

        Ok(Product {
            id,
            name,
            local_name: None,
            price,
            category: None,
        })
    }

    /// Builds a product from `'static` seed parts that already satisfy the
    /// invariants above.
    pub(crate) fn seeded(
        id: &'static str,
        name: &'static str,
        local_name: &'static str,
        price: Money,
        category: &'static str,
    ) -> Self {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            local_name: Some(local_name.to_string()),
            price,
            category: Some(category.to_string()),
        }
    }

    /// Sets the secondary display name (the source data carries Chinese names).
    pub fn with_local_name(mut self, local_name: impl Into<String>) -> ValidationResult<Self> {
        let local_name = local_name.into();
        validate_product_name("local name", &local_name)?;
        self.local_name = Some(local_name);
        Ok(self)
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns a copy carrying `new_price`, every other attribute preserved.
    pub fn with_price(&self, new_price: Money) -> ValidationResult<Self> {
        validate_positive_amount("price", new_price)?;
        Ok(Product {
            price: new_price,
            ..self.clone()
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local_name(&self) -> Option<&str> {
        self.local_name.as_deref()
    }

    /// Unit price per jin.
    pub fn price(&self) -> Money {
        self.price
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Price of `quantity` units at list price.
    pub fn subtotal(&self, quantity: i64) -> ValidationResult<Money> {
        validate_quantity(quantity)?;
        self.price.multiply_quantity(quantity)
    }

    /// Price of `quantity` units at `rate`, rounded half-up to the fen.
    ///
    /// Useful for displaying a single line. Rules never sum these rounded
    /// values; they accumulate [`ExactAmount`]s instead.
    pub fn discounted_subtotal(&self, quantity: i64, rate: DiscountRate) -> ValidationResult<Money> {
        validate_quantity(quantity)?;
        ExactAmount::line(self.price, quantity, rate)?.round()
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.local_name {
            Some(local) => write!(f, "{} ({}) {}", self.name, local, self.price)?,
            None => write!(f, "{} {}", self.name, self.price)?,
        }
        if let Some(category) = &self.category {
            write!(f, " [{category}]")?;
        }
        Ok(())
    }
}

/// Unvalidated wire shape of a [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductRecord {
    id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    local_name: Option<String>,
    price_cents: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let mut product = Product::new(record.id, record.name, Money::from_cents(record.price_cents))?;
        if let Some(local) = record.local_name {
            product = product.with_local_name(local)?;
        }
        if let Some(category) = record.category {
            product = product.with_category(category);
        }
        Ok(product)
    }
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        ProductRecord {
            id: product.id,
            name: product.name,
            local_name: product.local_name,
            price_cents: product.price.cents(),
            category: product.category,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn apple() -> Product {
        Product::new("APPLE", "Apple", Money::from_cents(800)).unwrap()
    }

    #[test]
    fn test_discount_rate_from_bps() {
        assert_eq!(DiscountRate::try_from_bps(8000).unwrap().bps(), 8000);
        assert!(DiscountRate::try_from_bps(0).is_err());
        assert!(DiscountRate::try_from_bps(10_001).is_err());
        assert!(DiscountRate::default().is_full_price());
    }

    #[test]
    fn test_discount_rate_parse_and_display() {
        assert_eq!("1".parse::<DiscountRate>().unwrap(), DiscountRate::FULL_PRICE);
        assert_eq!("0.8".parse::<DiscountRate>().unwrap().bps(), 8000);
        assert_eq!("0.0001".parse::<DiscountRate>().unwrap().bps(), 1);
        assert!("0.00001".parse::<DiscountRate>().is_err());
        assert!("-0.5".parse::<DiscountRate>().is_err());

        assert_eq!(DiscountRate::FULL_PRICE.to_string(), "1");
        assert_eq!(DiscountRate::try_from_bps(5500).unwrap().to_string(), "0.55");
        assert_eq!(DiscountRate::try_from_bps(1).unwrap().to_string(), "0.0001");
        assert_eq!("0.8000".parse::<DiscountRate>().unwrap().bps(), 8000);
    }

    #[test]
    fn test_discount_rate_parse_errors() {
        assert!(matches!(
            "0.00001".parse::<DiscountRate>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            "1.5".parse::<DiscountRate>(),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            "eighty".parse::<DiscountRate>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_product_validation() {
        assert!(Product::new("", "Apple", Money::from_cents(800)).is_err());
        assert!(Product::new("APPLE", "  ", Money::from_cents(800)).is_err());
        assert!(Product::new("APPLE", "Apple", Money::zero()).is_err());
        assert!(Product::new("APPLE", "Apple", Money::from_cents(-1)).is_err());
        assert!(apple().with_local_name("").is_err());
    }

    #[test]
    fn test_with_price_preserves_attributes() {
        let original = apple()
            .with_local_name("苹果")
            .unwrap()
            .with_category("fruit");
        let updated = original.with_price(Money::from_cents(950)).unwrap();

        assert_eq!(updated.price().cents(), 950);
        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.local_name(), Some("苹果"));
        assert_eq!(updated.category(), Some("fruit"));
        assert_eq!(original.price().cents(), 800);

        assert!(original.with_price(Money::zero()).is_err());
    }

    #[test]
    fn test_subtotals() {
        let strawberry = Product::new("STRAWBERRY", "Strawberry", Money::from_cents(1300)).unwrap();
        let eighty = DiscountRate::try_from_bps(8000).unwrap();

        assert_eq!(strawberry.subtotal(0).unwrap(), Money::zero());
        assert_eq!(strawberry.subtotal(3).unwrap().cents(), 3900);
        assert_eq!(strawberry.discounted_subtotal(2, eighty).unwrap().cents(), 2080);
        assert!(strawberry.subtotal(-1).is_err());
        assert!(strawberry.discounted_subtotal(-1, eighty).is_err());
    }

    #[test]
    fn test_subtotals_overflow_instead_of_wrapping() {
        let gold = Product::new("GOLD", "Gold", Money::from_cents(i64::MAX / 2)).unwrap();
        assert!(matches!(gold.subtotal(3), Err(ValidationError::Overflow { .. })));
        assert!(matches!(
            gold.discounted_subtotal(3, DiscountRate::FULL_PRICE),
            Err(ValidationError::Overflow { .. })
        ));
        assert!(gold.subtotal(2).is_ok());
    }

    #[test]
    fn test_product_json_uses_cents() {
        let json = serde_json::to_value(apple()).unwrap();
        assert_eq!(json["price_cents"], 800);
        assert!(json.get("category").is_none());

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, apple());

        let bad = serde_json::json!({ "id": "X", "name": "X", "price_cents": 0 });
        assert!(serde_json::from_value::<Product>(bad).is_err());
    }
}
