//! # Catalog
//!
//! The authoritative mapping from product identifier to [`Product`].
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Catalog::new() ───────────────► empty                                 │
//! │  Catalog::with_default_fruits() ► APPLE, STRAWBERRY, MANGO             │
//! │                                                                         │
//! │  add_product(p) ─────────────► insert or replace by id                 │
//! │  update_product_price(id, ¥) ► replace with p.with_price(¥)            │
//! │  remove_product(id) ─────────► no cascade: purchases hold ids only     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backed by a `BTreeMap` so listings come out in identifier order.

use std::collections::BTreeMap;

use tracing::debug;

use crate::money::Money;
use crate::types::Product;
use crate::validation::ValidationResult;

/// One seeded fruit: (id, name, local name, price).
type SeedFruit = (&'static str, &'static str, &'static str, Money);

/// The fixed fruit set.
const DEFAULT_FRUITS: &[SeedFruit] = &[
    ("APPLE", "Apple", "苹果", Money::from_cents(800)),
    ("STRAWBERRY", "Strawberry", "草莓", Money::from_cents(1300)),
    ("MANGO", "Mango", "芒果", Money::from_cents(2000)),
];

const EXTENDED_FRUITS: &[SeedFruit] = &[
    ("ORANGE", "Orange", "橙子", Money::from_cents(1200)),
    ("BANANA", "Banana", "香蕉", Money::from_cents(600)),
    ("GRAPE", "Grape", "葡萄", Money::from_cents(1500)),
    ("PEAR", "Pear", "梨", Money::from_cents(900)),
    ("WATERMELON", "Watermelon", "西瓜", Money::from_cents(300)),
];

/// Category assigned to the seeded fruit.
pub const FRUIT_CATEGORY: &str = "fruit";

/// Product catalog keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: BTreeMap<String, Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded with apple (¥8.00), strawberry (¥13.00)
    /// and mango (¥20.00).
    ///
    /// ## Example
    /// ```rust
    /// use grocer_core::catalog::Catalog;
    ///
    /// let catalog = Catalog::with_default_fruits();
    /// assert_eq!(catalog.count(), 3);
    /// assert_eq!(catalog.get_product("MANGO").unwrap().price().cents(), 2000);
    /// ```
    pub fn with_default_fruits() -> Self {
        let mut catalog = Self::new();
        catalog.seed(DEFAULT_FRUITS);
        catalog
    }

    /// Default fruits plus orange, banana, grape, pear and watermelon.
    pub fn with_extended_fruits() -> Self {
        let mut catalog = Self::with_default_fruits();
        catalog.seed(EXTENDED_FRUITS);
        catalog
    }

    fn seed(&mut self, entries: &[SeedFruit]) {
        for &(id, name, local_name, price) in entries {
            let product = Product::seeded(id, name, local_name, price, FRUIT_CATEGORY);
            self.products.insert(id.to_string(), product);
        }
    }

    /// Inserts a product, replacing any product with the same identifier.
    ///
    /// Products are validated at construction, so an invalid one cannot
    /// reach this point. Returns the replaced product, if any.
    pub fn add_product(&mut self, product: Product) -> Option<Product> {
        debug!(product_id = product.id(), price = %product.price(), "Adding product to catalog");
        self.products.insert(product.id().to_string(), product)
    }

    /// Looks up a product. Absence is not an error.
    pub fn get_product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.products.contains_key(id)
    }

    /// Removes and returns a product.
    ///
    /// Purchases that still reference `id` will fail to price with
    /// [`CoreError::ProductNotFound`](crate::error::CoreError::ProductNotFound).
    pub fn remove_product(&mut self, id: &str) -> Option<Product> {
        let removed = self.products.remove(id);
        if removed.is_some() {
            debug!(product_id = id, "Removed product from catalog");
        }
        removed
    }

    /// Replaces the product with a copy carrying `new_price`.
    ///
    /// ## Returns
    /// - `Ok(false)` if `id` is unknown (nothing changes)
    /// - `Ok(true)` once the product has been replaced
    /// - `Err(_)` if `new_price` is not positive
    pub fn update_product_price(&mut self, id: &str, new_price: Money) -> ValidationResult<bool> {
        let Some(existing) = self.products.get(id) else {
            return Ok(false);
        };

        let updated = existing.with_price(new_price)?;
        debug!(
            product_id = id,
            old_price = %existing.price(),
            new_price = %new_price,
            "Updating product price"
        );
        self.products.insert(id.to_string(), updated);
        Ok(true)
    }

    pub fn count(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    /// All products in identifier order.
    pub fn list_all(&self) -> Vec<&Product> {
        self.products.values().collect()
    }

    /// Iterates products in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }
}

impl Extend<Product> for Catalog {
    fn extend<I: IntoIterator<Item = Product>>(&mut self, iter: I) {
        for product in iter {
            self.add_product(product);
        }
    }
}

impl FromIterator<Product> for Catalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        catalog.extend(iter);
        catalog
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
