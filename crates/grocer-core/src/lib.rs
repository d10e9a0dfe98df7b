//! # grocer-core: Pure Pricing Logic for Grocer
//!
//! This crate is the **heart** of Grocer. It prices supermarket purchases
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Grocer Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                grocer-service (orchestration)                   │   │
//! │  │    pricing.toml ──► PricingConfig ──► PricingService            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ grocer-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  money   │ │ catalog  │ │ purchase │ │ discount │          │   │
//! │  │   │  Money   │ │ Catalog  │ │ Purchase │ │ Discount │          │   │
//! │  │   │  Exact   │ │ Product  │ │          │ │  Config  │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                      ┌──────────────────┐                       │   │
//! │  │                      │       rule       │                       │   │
//! │  │                      │ Standard / Promo │                       │   │
//! │  │                      │  BulkDiscount<R> │                       │   │
//! │  │                      └──────────────────┘                       │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product and DiscountRate
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Product catalog keyed by identifier
//! - [`purchase`] - Purchase record (product id → quantity)
//! - [`discount`] - Per-product discount multipliers
//! - [`rule`] - Pricing rules and the bulk discount decorator
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Pricing is deterministic - same input = same output
//! 2. **No I/O**: Files, environment and network belong to grocer-service
//! 3. **Integer Money**: Amounts are fen (i64), rates are basis points (u32)
//! 4. **Round Once**: Line items are summed exactly, then rounded half-up
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use grocer_core::{BulkDiscount, Catalog, Money, PricingRule, Product, Purchase, StandardPricing};
//!
//! let mut catalog = Catalog::new();
//! catalog.add_product(Product::new("DURIAN", "Durian", Money::from_cents(5000)).unwrap());
//! catalog.add_product(Product::new("BLUEBERRY", "Blueberry", Money::from_cents(4500)).unwrap());
//!
//! let mut purchase = Purchase::new();
//! purchase.add_quantity(&catalog, "DURIAN", 1).unwrap();
//! purchase.add_quantity(&catalog, "BLUEBERRY", 1).unwrap();
//!
//! let rule = BulkDiscount::with_defaults(StandardPricing);
//! assert_eq!(rule.calculate_total(&purchase, &catalog).unwrap().cents(), 9500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod discount;
pub mod error;
pub mod money;
pub mod purchase;
pub mod rule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::Catalog;
pub use discount::DiscountConfiguration;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::{ExactAmount, Money};
pub use purchase::Purchase;
pub use rule::{BulkDiscount, PricingRule, PromotionPricing, StandardPricing};
pub use types::{DiscountRate, Product};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Subtotal at which the default bulk rebate starts to apply (¥100.00).
pub const DEFAULT_BULK_THRESHOLD: Money = Money::from_cents(10_000);

/// Default bulk rebate (¥10.00).
pub const DEFAULT_BULK_REBATE: Money = Money::from_cents(1_000);
