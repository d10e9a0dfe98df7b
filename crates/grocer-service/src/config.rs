//! # Pricing Configuration
//!
//! Configuration for catalogs, promotions and the bulk discount.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GROCER_BULK_THRESHOLD=150.00                                       │
//! │     GROCER_BULK_REBATE=15.00                                           │
//! │     GROCER_CATALOG_SEED=extended                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $GROCER_CONFIG, or                                                 │
//! │     ~/.config/grocer/pricing.toml (Linux)                              │
//! │     ~/Library/Application Support/com.grocer.grocer/pricing.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     default fruits, ¥10.00 off from ¥100.00                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricing.toml
//! [catalog]
//! seed = "default"   # none | default | extended
//!
//! [bulk]
//! threshold = "100.00"
//! rebate = "10.00"
//!
//! [[products]]
//! id = "DURIAN"
//! name = "Durian"
//! local_name = "榴莲"
//! price = "50.00"
//! category = "fruit"
//!
//! [promotions.weekend]
//! description = "Weekend special"
//! rates = { DURIAN = "0.9", MANGO = "0.75" }
//! ```
//!
//! Amounts and rates are decimal strings, parsed with `rust_decimal` and
//! converted to fen and basis points; extra precision is rejected, never
//! rounded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use grocer_core::{Catalog, DiscountConfiguration, DiscountRate, Money, Product, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "GROCER_CONFIG";

// =============================================================================
// Catalog Seed
// =============================================================================

/// Which built-in products the catalog starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSeed {
    /// Start empty; only configured products exist.
    None,

    /// Apple, strawberry, mango.
    #[default]
    Default,

    /// The default fruits plus orange, banana, grape, pear, watermelon.
    Extended,
}

impl CatalogSeed {
    /// Builds the seeded catalog.
    pub fn catalog(&self) -> Catalog {
        match self {
            CatalogSeed::None => Catalog::new(),
            CatalogSeed::Default => Catalog::with_default_fruits(),
            CatalogSeed::Extended => Catalog::with_extended_fruits(),
        }
    }
}

impl std::fmt::Display for CatalogSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSeed::None => write!(f, "none"),
            CatalogSeed::Default => write!(f, "default"),
            CatalogSeed::Extended => write!(f, "extended"),
        }
    }
}

impl FromStr for CatalogSeed {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "empty" => Ok(CatalogSeed::None),
            "default" | "fruit" => Ok(CatalogSeed::Default),
            "extended" => Ok(CatalogSeed::Extended),
            other => Err(ServiceError::InvalidConfig(format!(
                "Unknown catalog seed: '{}'. Valid options: none, default, extended",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// `[catalog]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub seed: CatalogSeed,
}

/// `[bulk]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkSettings {
    /// Subtotal at which the rebate applies (inclusive).
    #[serde(default = "default_threshold")]
    pub threshold: String,

    /// Flat amount taken off a qualifying subtotal.
    #[serde(default = "default_rebate")]
    pub rebate: String,
}

fn default_threshold() -> String {
    "100.00".to_string()
}

fn default_rebate() -> String {
    "10.00".to_string()
}

impl Default for BulkSettings {
    fn default() -> Self {
        BulkSettings {
            threshold: default_threshold(),
            rebate: default_rebate(),
        }
    }
}

impl BulkSettings {
    /// Parsed threshold and rebate, both required to be positive.
    pub fn amounts(&self) -> ServiceResult<(Money, Money)> {
        let threshold = parse_amount("bulk.threshold", &self.threshold)?;
        let rebate = parse_amount("bulk.rebate", &self.rebate)?;

        if !threshold.is_positive() || !rebate.is_positive() {
            return Err(ServiceError::InvalidConfig(
                "bulk threshold and rebate must be greater than 0".into(),
            ));
        }

        Ok((threshold, rebate))
    }
}

/// One `[[products]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ProductEntry {
    /// Builds the validated product.
    pub fn to_product(&self) -> ServiceResult<Product> {
        let context = |err: ValidationError| {
            ServiceError::InvalidConfig(format!("product {}: {}", self.id, err))
        };

        let price = parse_amount(&format!("product {} price", self.id), &self.price)?;
        let mut product = Product::new(&self.id, &self.name, price).map_err(context)?;
        if let Some(local) = &self.local_name {
            product = product.with_local_name(local).map_err(context)?;
        }
        if let Some(category) = &self.category {
            product = product.with_category(category);
        }
        Ok(product)
    }
}

/// One `[promotions.<name>]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromotionEntry {
    /// Defaults to the promotion's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Product id → decimal multiplier.
    #[serde(default)]
    pub rates: BTreeMap<String, String>,
}

impl PromotionEntry {
    /// Builds the discount configuration named `name`.
    pub fn to_discounts(&self, name: &str) -> ServiceResult<DiscountConfiguration> {
        let description = self.description.clone().unwrap_or_else(|| name.to_string());
        let mut discounts = DiscountConfiguration::new(description);

        for (product_id, raw) in &self.rates {
            let context = |err: ValidationError| {
                ServiceError::InvalidConfig(format!("promotion {name}, {product_id}: {err}"))
            };
            let value = parse_decimal(&format!("promotion {name}, {product_id}"), raw)?;
            let rate = DiscountRate::from_decimal(value).map_err(context)?;
            discounts.set_discount(product_id, rate).map_err(context)?;
        }

        Ok(discounts)
    }
}

fn parse_decimal(field: &str, raw: &str) -> ServiceResult<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|err| ServiceError::InvalidConfig(format!("{field}: '{raw}': {err}")))
}

fn parse_amount(field: &str, raw: &str) -> ServiceResult<Money> {
    Money::from_decimal(parse_decimal(field, raw)?)
        .map_err(|err| ServiceError::InvalidConfig(format!("{field}: {err}")))
}

// =============================================================================
// Main Pricing Configuration
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub bulk: BulkSettings,

    /// Products added on top of the seed (replacing seeded ids).
    #[serde(default)]
    pub products: Vec<ProductEntry>,

    /// Named discount profiles; a name matching a preset replaces it.
    #[serde(default)]
    pub promotions: BTreeMap<String, PromotionEntry>,
}

impl PricingConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$GROCER_CONFIG`, or pricing.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ServiceResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading pricing config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pricing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> ServiceResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates by building everything the config describes.
    pub fn validate(&self) -> ServiceResult<()> {
        self.bulk.amounts()?;
        self.build_catalog()?;
        self.discount_profiles()?;
        Ok(())
    }

    /// Applies `GROCER_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(threshold) = lookup("GROCER_BULK_THRESHOLD") {
            debug!(threshold = %threshold, "Overriding bulk threshold from environment");
            self.bulk.threshold = threshold;
        }

        if let Some(rebate) = lookup("GROCER_BULK_REBATE") {
            debug!(rebate = %rebate, "Overriding bulk rebate from environment");
            self.bulk.rebate = rebate;
        }

        if let Some(seed) = lookup("GROCER_CATALOG_SEED") {
            match seed.parse() {
                Ok(parsed) => self.catalog.seed = parsed,
                Err(_) => warn!(seed = %seed, "Unknown catalog seed in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }

        directories::ProjectDirs::from("com", "grocer", "grocer")
            .map(|dirs| dirs.config_dir().join("pricing.toml"))
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// The seeded catalog with every configured product added.
    pub fn build_catalog(&self) -> ServiceResult<Catalog> {
        let mut catalog = self.catalog.seed.catalog();
        for entry in &self.products {
            catalog.add_product(entry.to_product()?);
        }
        Ok(catalog)
    }

    /// Built-in presets plus configured promotions, by name.
    pub fn discount_profiles(&self) -> ServiceResult<BTreeMap<String, DiscountConfiguration>> {
        let mut profiles = preset_profiles();
        for (name, entry) in &self.promotions {
            profiles.insert(name.clone(), entry.to_discounts(name)?);
        }
        Ok(profiles)
    }
}

/// The built-in discount presets keyed by profile name.
pub fn preset_profiles() -> BTreeMap<String, DiscountConfiguration> {
    BTreeMap::from([
        ("strawberry".to_string(), DiscountConfiguration::strawberry_promotion()),
        ("multi_fruit".to_string(), DiscountConfiguration::multi_fruit_promotion()),
        ("black_friday".to_string(), DiscountConfiguration::black_friday()),
        ("member".to_string(), DiscountConfiguration::member_exclusive()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[catalog]
seed = "extended"

[bulk]
threshold = "150.00"
rebate = "15.00"

[[products]]
id = "DURIAN"
name = "Durian"
local_name = "榴莲"
price = "50.00"
category = "fruit"

[promotions.weekend]
description = "Weekend special"
rates = { DURIAN = "0.9", MANGO = "0.75" }

[promotions.member]
rates = { APPLE = "0.5" }
"#;

    #[test]
    fn test_catalog_seed_parsing() {
        assert_eq!("none".parse::<CatalogSeed>().unwrap(), CatalogSeed::None);
        assert_eq!("Default".parse::<CatalogSeed>().unwrap(), CatalogSeed::Default);
        assert_eq!("extended".parse::<CatalogSeed>().unwrap(), CatalogSeed::Extended);
        assert!("everything".parse::<CatalogSeed>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = PricingConfig::default();
        assert_eq!(config.catalog.seed, CatalogSeed::Default);
        assert_eq!(
            config.bulk.amounts().unwrap(),
            (Money::from_cents(10_000), Money::from_cents(1_000))
        );
        assert_eq!(config.build_catalog().unwrap().count(), 3);
        assert_eq!(config.discount_profiles().unwrap().len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_sample() {
        let config: PricingConfig = toml::from_str(SAMPLE).unwrap();
        assert!(config.validate().is_ok());

        let catalog = config.build_catalog().unwrap();
        assert_eq!(catalog.count(), 9);
        let durian = catalog.get_product("DURIAN").unwrap();
        assert_eq!(durian.price().cents(), 5000);
        assert_eq!(durian.local_name(), Some("榴莲"));

        let profiles = config.discount_profiles().unwrap();
        assert_eq!(profiles.len(), 5);
        let weekend = &profiles["weekend"];
        assert_eq!(weekend.description(), "Weekend special");
        assert_eq!(weekend.get_discount_rate("MANGO").bps(), 7500);

        // Configured profile replaces the preset of the same name.
        let member = &profiles["member"];
        assert_eq!(member.description(), "member");
        assert_eq!(member.len(), 1);
        assert_eq!(member.get_discount_rate("APPLE").bps(), 5000);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = PricingConfig::default();
        config.bulk.rebate = "0".into();
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.bulk.threshold = "one hundred".into();
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.products.push(ProductEntry {
            id: "FREE".into(),
            name: "Free sample".into(),
            local_name: None,
            price: "0.00".into(),
            category: None,
        });
        assert!(matches!(config.validate(), Err(ServiceError::InvalidConfig(_))));

        let mut config = PricingConfig::default();
        config.promotions.insert(
            "broken".into(),
            PromotionEntry {
                description: None,
                rates: BTreeMap::from([("APPLE".to_string(), "1.5".to_string())]),
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_decimal_strings() {
        let mut bulk = BulkSettings {
            threshold: " 88.5 ".into(),
            rebate: "8.50".into(),
        };
        assert_eq!(
            bulk.amounts().unwrap(),
            (Money::from_cents(8_850), Money::from_cents(850))
        );

        // Sub-fen precision is rejected, not rounded.
        bulk.rebate = "8.505".into();
        assert!(matches!(bulk.amounts(), Err(ServiceError::InvalidConfig(_))));

        // Parses as a decimal but does not fit in fen.
        bulk.rebate = "99999999999999999999".into();
        assert!(matches!(bulk.amounts(), Err(ServiceError::InvalidConfig(_))));

        let promotion = PromotionEntry {
            description: None,
            rates: BTreeMap::from([("MANGO".to_string(), "0.7500".to_string())]),
        };
        let discounts = promotion.to_discounts("mango").unwrap();
        assert_eq!(discounts.get_discount_rate("MANGO").bps(), 7500);

        let too_precise = PromotionEntry {
            description: None,
            rates: BTreeMap::from([("MANGO".to_string(), "0.12345".to_string())]),
        };
        assert!(too_precise.to_discounts("mango").is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = PricingConfig::default();
        config.apply_overrides_from(|key| match key {
            "GROCER_BULK_THRESHOLD" => Some("200.00".into()),
            "GROCER_BULK_REBATE" => Some("25.50".into()),
            "GROCER_CATALOG_SEED" => Some("none".into()),
            _ => None,
        });

        assert_eq!(
            config.bulk.amounts().unwrap(),
            (Money::from_cents(20_000), Money::from_cents(2_550))
        );
        assert_eq!(config.catalog.seed, CatalogSeed::None);
        assert!(config.build_catalog().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_seed_override_is_ignored() {
        let mut config = PricingConfig::default();
        config.apply_overrides_from(|key| (key == "GROCER_CATALOG_SEED").then(|| "bogus".into()));
        assert_eq!(config.catalog.seed, CatalogSeed::Default);
    }

    #[test]
    fn test_toml_serialization() {
        let config: PricingConfig = toml::from_str(SAMPLE).unwrap();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[bulk]"));
        assert!(toml_str.contains("[[products]]"));
    }
}
