//! # Purchase Record
//!
//! The (product id, quantity) pairs of one transaction.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Purchase Operations                                  │
//! │                                                                         │
//! │  add_quantity(&catalog, "APPLE", 2) ──► APPLE: 0 + 2 = 2               │
//! │  add_quantity(&catalog, "APPLE", 1) ──► APPLE: 2 + 1 = 3               │
//! │  set_quantity(&catalog, "APPLE", 5) ──► APPLE: 5                       │
//! │  set_quantity(&catalog, "APPLE", 0) ──► entry removed                  │
//! │                                                                         │
//! │  Every mutator first checks:                                           │
//! │    • id not empty          → InvalidArgument                           │
//! │    • quantity ≥ 0          → InvalidArgument                           │
//! │    • id in catalog         → InvalidArgument                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Only non-zero quantities are stored (the map stays sparse)
//! - The record holds identifiers, never product references; the catalog is
//!   consulted again when the purchase is priced

use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::ValidationError;
use crate::validation::{validate_quantity, ValidationResult};

/// Quantities purchased per product identifier (unit: jin).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Purchase {
    quantities: BTreeMap<String, i64>,
}

impl Purchase {
    /// Creates an empty purchase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` units of `product_id`, accumulating onto any existing
    /// quantity.
    ///
    /// ## Example
    /// ```rust
    /// use grocer_core::catalog::Catalog;
    /// use grocer_core::purchase::Purchase;
    ///
    /// let catalog = Catalog::with_default_fruits();
    /// let mut purchase = Purchase::new();
    ///
    /// purchase.add_quantity(&catalog, "APPLE", 2).unwrap();
    /// purchase.add_quantity(&catalog, "APPLE", 1).unwrap();
    /// assert_eq!(purchase.get_quantity("APPLE"), 3);
    ///
    /// assert!(purchase.add_quantity(&catalog, "APPLE", -1).is_err());
    /// assert!(purchase.add_quantity(&catalog, "KIWI", 1).is_err());
    /// ```
    pub fn add_quantity(&mut self, catalog: &Catalog, product_id: &str, delta: i64) -> ValidationResult<()> {
        validate_entry(catalog, product_id, delta)?;

        if delta == 0 {
            return Ok(());
        }

        let quantity = self
            .get_quantity(product_id)
            .checked_add(delta)
            .ok_or_else(|| ValidationError::Overflow {
                field: "quantity".to_string(),
            })?;

        self.quantities.insert(product_id.to_string(), quantity);
        debug!(product_id, delta, quantity, "Added to purchase");
        Ok(())
    }

    /// Sets the quantity of `product_id`. Zero removes the entry.
    pub fn set_quantity(&mut self, catalog: &Catalog, product_id: &str, quantity: i64) -> ValidationResult<()> {
        validate_entry(catalog, product_id, quantity)?;

        if quantity == 0 {
            self.quantities.remove(product_id);
        } else {
            self.quantities.insert(product_id.to_string(), quantity);
        }
        debug!(product_id, quantity, "Set purchase quantity");
        Ok(())
    }

    /// Quantity of `product_id`, 0 if absent.
    pub fn get_quantity(&self, product_id: &str) -> i64 {
        self.quantities.get(product_id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Number of distinct products purchased.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Sum of all quantities, saturating at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.quantities.values().fold(0, |total, &qty| total.saturating_add(qty))
    }

    /// Identifiers with a non-zero quantity, in identifier order.
    pub fn list_product_ids(&self) -> Vec<&str> {
        self.quantities.keys().map(String::as_str).collect()
    }

    /// Iterates `(product_id, quantity)` in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.quantities.iter().map(|(id, qty)| (id.as_str(), *qty))
    }

    pub fn clear(&mut self) {
        self.quantities.clear();
    }
}

fn validate_entry(catalog: &Catalog, product_id: &str, quantity: i64) -> ValidationResult<()> {
    if product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    validate_quantity(quantity)?;

    if !catalog.contains(product_id) {
        return Err(ValidationError::NotInCatalog {
            product_id: product_id.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates() {
        let catalog = Catalog::with_default_fruits();
        let mut purchase = Purchase::new();

        purchase.add_quantity(&catalog, "MANGO", 2).unwrap();
        purchase.add_quantity(&catalog, "MANGO", 3).unwrap();
        purchase.add_quantity(&catalog, "APPLE", 1).unwrap();

        assert_eq!(purchase.get_quantity("MANGO"), 5);
        assert_eq!(purchase.len(), 2);
        assert_eq!(purchase.total_quantity(), 6);
    }

    #[test]
    fn test_add_zero_keeps_record_sparse() {
        let catalog = Catalog::with_default_fruits();
        let mut purchase = Purchase::new();

        purchase.add_quantity(&catalog, "APPLE", 0).unwrap();
        assert!(purchase.is_empty());
    }

    #[test]
    fn test_set_zero_removes_entry() {
        let catalog = Catalog::with_default_fruits();
        let mut purchase = Purchase::new();

        purchase.set_quantity(&catalog, "STRAWBERRY", 4).unwrap();
        assert!(!purchase.is_empty());

        purchase.set_quantity(&catalog, "STRAWBERRY", 0).unwrap();
        assert!(purchase.is_empty());
        assert_eq!(purchase.get_quantity("STRAWBERRY"), 0);
        assert!(purchase.list_product_ids().is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let catalog = Catalog::with_default_fruits();
        let mut purchase = Purchase::new();

        purchase.add_quantity(&catalog, "APPLE", 7).unwrap();
        purchase.set_quantity(&catalog, "APPLE", 2).unwrap();
        assert_eq!(purchase.get_quantity("APPLE"), 2);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let catalog = Catalog::with_default_fruits();
        let mut purchase = Purchase::new();

        assert!(matches!(
            purchase.add_quantity(&catalog, "APPLE", -2),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
        assert!(matches!(
            purchase.set_quantity(&catalog, "APPLE", -1),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
        assert!(matches!(
            purchase.add_quantity(&catalog, "", 1),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            purchase.set_quantity(&catalog, "DURIAN", 1),
            Err(ValidationError::NotInCatalog { .. })
        ));
        assert!(purchase.is_empty());
    }

    #[test]
    fn test_listing_order() {
        let catalog = Catalog::with_default_fruits();
        let mut purchase = Purchase::new();
        purchase.add_quantity(&catalog, "STRAWBERRY", 1).unwrap();
        purchase.add_quantity(&catalog, "APPLE", 2).unwrap();

        assert_eq!(purchase.list_product_ids(), vec!["APPLE", "STRAWBERRY"]);
        let pairs: Vec<(&str, i64)> = purchase.iter().collect();
        assert_eq!(pairs, vec![("APPLE", 2), ("STRAWBERRY", 1)]);

        purchase.clear();
        assert!(purchase.is_empty());
    }

    #[test]
    fn test_add_overflow_is_rejected_and_keeps_quantity() {
        let catalog = Catalog::with_default_fruits();
        let mut purchase = Purchase::new();

        purchase.add_quantity(&catalog, "APPLE", i64::MAX).unwrap();
        let err = purchase.add_quantity(&catalog, "APPLE", 1).unwrap_err();

        assert!(matches!(err, ValidationError::Overflow { ref field } if field == "quantity"));
        assert_eq!(purchase.get_quantity("APPLE"), i64::MAX);

        purchase.add_quantity(&catalog, "MANGO", 5).unwrap();
        assert_eq!(purchase.total_quantity(), i64::MAX);
    }
}
