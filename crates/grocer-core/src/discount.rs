//! # Discount Configuration
//!
//! A named set of per-product discount multipliers.
//!
//! The key contract: a product without an entry is charged full price.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Multi-fruit promotion"                                                │
//! │    STRAWBERRY → 0.8                                                     │
//! │    MANGO      → 0.9                                                     │
//! │    (anything) → 1   ◄── default, never stored                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A configuration is independent of any purchase and can be reused across
//! many calculations.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::ValidationError;
use crate::types::DiscountRate;
use crate::validation::ValidationResult;

// =============================================================================
// Presets
// =============================================================================

type PresetRate = (&'static str, DiscountRate);

const STRAWBERRY_PROMOTION: &[PresetRate] = &[("STRAWBERRY", DiscountRate::from_bps_const(8000))];

const MULTI_FRUIT_PROMOTION: &[PresetRate] = &[
    ("STRAWBERRY", DiscountRate::from_bps_const(8000)),
    ("MANGO", DiscountRate::from_bps_const(9000)),
];

const BLACK_FRIDAY: &[PresetRate] = &[
    ("APPLE", DiscountRate::from_bps_const(5000)),
    ("STRAWBERRY", DiscountRate::from_bps_const(6000)),
    ("MANGO", DiscountRate::from_bps_const(7000)),
    ("ORANGE", DiscountRate::from_bps_const(5500)),
    ("BANANA", DiscountRate::from_bps_const(4000)),
];

const MEMBER_EXCLUSIVE: &[PresetRate] = &[
    ("APPLE", DiscountRate::from_bps_const(8500)),
    ("STRAWBERRY", DiscountRate::from_bps_const(8500)),
    ("MANGO", DiscountRate::from_bps_const(8500)),
];

/// Per-product discount multipliers with a description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscountConfiguration {
    description: String,
    rates: BTreeMap<String, DiscountRate>,
}

impl DiscountConfiguration {
    /// Creates an empty configuration.
    pub fn new(description: impl Into<String>) -> Self {
        DiscountConfiguration {
            description: description.into(),
            rates: BTreeMap::new(),
        }
    }

    /// Strawberries at 0.8.
    pub fn strawberry_promotion() -> Self {
        Self::preset("Strawberry promotion", STRAWBERRY_PROMOTION)
    }

    /// Strawberries at 0.8, mangoes at 0.9.
    pub fn multi_fruit_promotion() -> Self {
        Self::preset("Multi-fruit promotion", MULTI_FRUIT_PROMOTION)
    }

    pub fn black_friday() -> Self {
        Self::preset("Black Friday", BLACK_FRIDAY)
    }

    pub fn member_exclusive() -> Self {
        Self::preset("Member exclusive", MEMBER_EXCLUSIVE)
    }

    fn preset(description: &str, entries: &[PresetRate]) -> Self {
        DiscountConfiguration {
            description: description.to_string(),
            rates: entries
                .iter()
                .map(|&(id, rate)| (id.to_string(), rate))
                .collect(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sets the multiplier for `product_id`, replacing any previous one.
    ///
    /// The rate is already range-checked by [`DiscountRate`]; use
    /// [`set_discount_bps`](Self::set_discount_bps) or parse a string for
    /// unchecked input.
    pub fn set_discount(&mut self, product_id: &str, rate: DiscountRate) -> ValidationResult<()> {
        if product_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product id".to_string(),
            });
        }

        debug!(product_id, rate = %rate, config = %self.description, "Setting discount");
        self.rates.insert(product_id.to_string(), rate);
        Ok(())
    }

    /// Sets the multiplier from basis points.
    ///
    /// ## Example
    /// ```rust
    /// use grocer_core::discount::DiscountConfiguration;
    ///
    /// let mut config = DiscountConfiguration::new("weekend");
    /// config.set_discount_bps("STRAWBERRY", 8000).unwrap();
    /// assert_eq!(config.get_discount_rate("STRAWBERRY").bps(), 8000);
    ///
    /// assert!(config.set_discount_bps("MANGO", 0).is_err());
    /// assert!(config.set_discount_bps("MANGO", 12_000).is_err());
    /// ```
    pub fn set_discount_bps(&mut self, product_id: &str, bps: u32) -> ValidationResult<()> {
        let rate = DiscountRate::try_from_bps(bps)?;
        self.set_discount(product_id, rate)
    }

    /// Sets many multipliers. Stops at the first invalid entry; entries
    /// before it stay set.
    pub fn extend<'a, I>(&mut self, entries: I) -> ValidationResult<()>
    where
        I: IntoIterator<Item = (&'a str, DiscountRate)>,
    {
        for (product_id, rate) in entries {
            self.set_discount(product_id, rate)?;
        }
        Ok(())
    }

    /// The multiplier for `product_id`; [`DiscountRate::FULL_PRICE`] when
    /// nothing is configured.
    pub fn get_discount_rate(&self, product_id: &str) -> DiscountRate {
        self.rates
            .get(product_id)
            .copied()
            .unwrap_or(DiscountRate::FULL_PRICE)
    }

    /// Removes and returns the configured multiplier.
    pub fn remove_discount(&mut self, product_id: &str) -> Option<DiscountRate> {
        self.rates.remove(product_id)
    }

    pub fn has_discount(&self, product_id: &str) -> bool {
        self.rates.contains_key(product_id)
    }

    /// Identifiers with a configured multiplier, in identifier order.
    pub fn discounted_ids(&self) -> Vec<&str> {
        self.rates.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DiscountRate)> {
        self.rates.iter().map(|(id, rate)| (id.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn clear(&mut self) {
        self.rates.clear();
    }
}

/// `Multi-fruit promotion - MANGO:0.9, STRAWBERRY:0.8`
impl fmt::Display for DiscountConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rates.is_empty() {
            return write!(f, "{} - no discounts", self.description);
        }
        let entries: Vec<String> = self
            .rates
            .iter()
            .map(|(id, rate)| format!("{id}:{rate}"))
            .collect();
        write!(f, "{} - {}", self.description, entries.join(", "))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(s: &str) -> DiscountRate {
        s.parse().unwrap()
    }

    #[test]
    fn test_unconfigured_is_full_price() {
        let config = DiscountConfiguration::new("empty");
        assert_eq!(config.get_discount_rate("ANYTHING"), DiscountRate::FULL_PRICE);
        assert!(!config.has_discount("ANYTHING"));
        assert!(config.is_empty());
    }

    #[test]
    fn test_set_get_remove() {
        let mut config = DiscountConfiguration::new("test");
        config.set_discount("MANGO", rate("0.9")).unwrap();

        assert!(config.has_discount("MANGO"));
        assert_eq!(config.get_discount_rate("MANGO").bps(), 9000);

        assert_eq!(config.remove_discount("MANGO"), Some(rate("0.9")));
        assert_eq!(config.remove_discount("MANGO"), None);
        assert_eq!(config.get_discount_rate("MANGO"), DiscountRate::FULL_PRICE);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let mut config = DiscountConfiguration::new("test");
        assert!(config.set_discount("", rate("0.5")).is_err());
        assert!(config.set_discount_bps("APPLE", 0).is_err());
        assert!(config.set_discount_bps("APPLE", 10_001).is_err());
        assert!(config.is_empty());
    }

    #[test]
    fn test_extend_stops_at_first_invalid() {
        let mut config = DiscountConfiguration::new("batch");
        let result = config.extend([
            ("APPLE", rate("0.5")),
            (" ", rate("0.6")),
            ("MANGO", rate("0.7")),
        ]);

        assert!(result.is_err());
        assert!(config.has_discount("APPLE"));
        assert!(!config.has_discount("MANGO"));
    }

    #[test]
    fn test_presets() {
        let black_friday = DiscountConfiguration::black_friday();
        assert_eq!(black_friday.len(), 5);
        assert_eq!(black_friday.get_discount_rate("BANANA").bps(), 4000);
        assert_eq!(black_friday.get_discount_rate("ORANGE").bps(), 5500);

        let member = DiscountConfiguration::member_exclusive();
        assert_eq!(member.discounted_ids(), vec!["APPLE", "MANGO", "STRAWBERRY"]);

        assert_eq!(
            DiscountConfiguration::strawberry_promotion()
                .get_discount_rate("STRAWBERRY")
                .bps(),
            8000
        );
    }

    #[test]
    fn test_preset_tables_keep_every_entry() {
        for (config, table) in [
            (DiscountConfiguration::strawberry_promotion(), STRAWBERRY_PROMOTION),
            (DiscountConfiguration::multi_fruit_promotion(), MULTI_FRUIT_PROMOTION),
            (DiscountConfiguration::black_friday(), BLACK_FRIDAY),
            (DiscountConfiguration::member_exclusive(), MEMBER_EXCLUSIVE),
        ] {
            assert_eq!(config.len(), table.len(), "{config}");
            for &(id, rate) in table {
                assert_eq!(DiscountRate::try_from_bps(rate.bps()), Ok(rate));
                assert_eq!(config.get_discount_rate(id), rate);
            }
        }
    }

    #[test]
    fn test_display_and_clear() {
        let mut config = DiscountConfiguration::multi_fruit_promotion();
        assert_eq!(
            config.to_string(),
            "Multi-fruit promotion - MANGO:0.9, STRAWBERRY:0.8"
        );

        config.clear();
        assert_eq!(config.to_string(), "Multi-fruit promotion - no discounts");
    }
}
