//! # Pricing Service
//!
//! Façade over grocer-core that owns a catalog, the named discount
//! profiles and the configured bulk discount, and prices the standard
//! customer scenarios.
//!
//! ## Scenarios
//! ```text
//! ┌────────────────┬───────────────────────────┬──────────────────────────┐
//! │ Customer       │ Products                  │ Rule                     │
//! ├────────────────┼───────────────────────────┼──────────────────────────┤
//! │ standard       │ apple, strawberry         │ StandardPricing          │
//! │ extended       │ apple, strawberry, mango  │ StandardPricing          │
//! │ promotional    │ apple, strawberry, mango  │ strawberry at 0.8        │
//! │ bulk           │ apple, strawberry, mango  │ promotional + bulk       │
//! └────────────────┴───────────────────────────┴──────────────────────────┘
//! ```

use std::collections::BTreeMap;

use grocer_core::{
    BulkDiscount, Catalog, DiscountConfiguration, Money, PricingRule, PromotionPricing, Purchase,
    StandardPricing, DEFAULT_BULK_REBATE, DEFAULT_BULK_THRESHOLD,
};
use tracing::{debug, info};

use crate::config::{preset_profiles, PricingConfig};
use crate::error::{ServiceError, ServiceResult};

/// Product ids the scenario methods buy.
pub const APPLE: &str = "APPLE";
pub const STRAWBERRY: &str = "STRAWBERRY";
pub const MANGO: &str = "MANGO";

/// Profile used by the promotional and bulk scenarios.
pub const PROMOTIONAL_PROFILE: &str = "strawberry";

/// Prices purchases against one catalog and a set of named promotions.
#[derive(Debug, Clone)]
pub struct PricingService {
    catalog: Catalog,
    profiles: BTreeMap<String, DiscountConfiguration>,
    bulk_threshold: Money,
    bulk_rebate: Money,
}

impl Default for PricingService {
    fn default() -> Self {
        Self::new(Catalog::with_default_fruits())
    }
}

impl PricingService {
    /// Creates a service over `catalog` with the preset promotions and the
    /// default bulk discount.
    pub fn new(catalog: Catalog) -> Self {
        PricingService {
            catalog,
            profiles: preset_profiles(),
            bulk_threshold: DEFAULT_BULK_THRESHOLD,
            bulk_rebate: DEFAULT_BULK_REBATE,
        }
    }

    /// Builds the service described by a loaded configuration.
    pub fn from_config(config: &PricingConfig) -> ServiceResult<Self> {
        let (bulk_threshold, bulk_rebate) = config.bulk.amounts()?;
        let service = PricingService {
            catalog: config.build_catalog()?,
            profiles: config.discount_profiles()?,
            bulk_threshold,
            bulk_rebate,
        };

        info!(
            products = service.catalog.count(),
            promotions = service.profiles.len(),
            threshold = %bulk_threshold,
            rebate = %bulk_rebate,
            "Pricing service configured"
        );

        Ok(service)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mutable catalog access; price changes apply to the next calculation.
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn bulk_threshold(&self) -> Money {
        self.bulk_threshold
    }

    pub fn bulk_rebate(&self) -> Money {
        self.bulk_rebate
    }

    // =========================================================================
    // Promotions
    // =========================================================================

    /// Looks up a named discount profile.
    pub fn promotion(&self, name: &str) -> ServiceResult<&DiscountConfiguration> {
        self.profiles
            .get(name)
            .ok_or_else(|| ServiceError::UnknownPromotion(name.to_string()))
    }

    /// Names of all discount profiles, sorted.
    pub fn promotion_names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Registers or replaces a named discount profile.
    pub fn add_promotion(&mut self, name: impl Into<String>, discounts: DiscountConfiguration) {
        let name = name.into();
        debug!(name = %name, discounts = %discounts, "Registering promotion");
        self.profiles.insert(name, discounts);
    }

    /// Promotion rule for a named profile.
    pub fn promotion_rule(&self, name: &str) -> ServiceResult<PromotionPricing> {
        Ok(PromotionPricing::new(self.promotion(name)?.clone()))
    }

    /// Wraps `inner` in the configured bulk discount.
    pub fn bulk_rule<R: PricingRule>(&self, inner: R) -> ServiceResult<BulkDiscount<R>> {
        Ok(BulkDiscount::new(inner, self.bulk_threshold, self.bulk_rebate)?)
    }

    // =========================================================================
    // Calculation
    // =========================================================================

    /// Prices `purchase` against this service's catalog with any rule.
    pub fn calculate_with_rule<R>(&self, purchase: &Purchase, rule: &R) -> ServiceResult<Money>
    where
        R: PricingRule + ?Sized,
    {
        let total = rule.calculate_total(purchase, &self.catalog)?;

        info!(
            rule = %rule.description(),
            items = purchase.total_quantity(),
            total = %total,
            "Calculated purchase total"
        );

        Ok(total)
    }

    /// Customer buying apples and strawberries at list price.
    pub fn standard_customer_total(&self, apples: i64, strawberries: i64) -> ServiceResult<Money> {
        let purchase = self.fruit_purchase(&[(APPLE, apples), (STRAWBERRY, strawberries)])?;
        self.calculate_with_rule(&purchase, &StandardPricing)
    }

    /// Customer buying apples, strawberries and mangoes at list price.
    pub fn extended_customer_total(
        &self,
        apples: i64,
        strawberries: i64,
        mangoes: i64,
    ) -> ServiceResult<Money> {
        let purchase = self.three_fruit_purchase(apples, strawberries, mangoes)?;
        self.calculate_with_rule(&purchase, &StandardPricing)
    }

    /// Customer paying 80% for strawberries.
    pub fn promotional_customer_total(
        &self,
        apples: i64,
        strawberries: i64,
        mangoes: i64,
    ) -> ServiceResult<Money> {
        let purchase = self.three_fruit_purchase(apples, strawberries, mangoes)?;
        let rule = self.promotion_rule(PROMOTIONAL_PROFILE)?;
        self.calculate_with_rule(&purchase, &rule)
    }

    /// Promotional customer who also gets the bulk rebate.
    pub fn bulk_customer_total(
        &self,
        apples: i64,
        strawberries: i64,
        mangoes: i64,
    ) -> ServiceResult<Money> {
        let purchase = self.three_fruit_purchase(apples, strawberries, mangoes)?;
        let rule = self.bulk_rule(self.promotion_rule(PROMOTIONAL_PROFILE)?)?;
        self.calculate_with_rule(&purchase, &rule)
    }

    fn three_fruit_purchase(&self, apples: i64, strawberries: i64, mangoes: i64) -> ServiceResult<Purchase> {
        self.fruit_purchase(&[(APPLE, apples), (STRAWBERRY, strawberries), (MANGO, mangoes)])
    }

    /// Builds a purchase from `(product id, quantity)` pairs.
    pub fn fruit_purchase(&self, lines: &[(&str, i64)]) -> ServiceResult<Purchase> {
        let mut purchase = Purchase::new();
        for &(product_id, quantity) in lines {
            purchase.set_quantity(&self.catalog, product_id, quantity)?;
        }
        Ok(purchase)
    }
}
