//! # Validation Module
//!
//! Input validation utilities for Grocer.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Points                                  │
//! │                                                                         │
//! │  Product::new ──────────► id, name, price                              │
//! │  Catalog::update_price ─► price                                        │
//! │  Purchase::add/set ─────► id, quantity, catalog membership             │
//! │  DiscountConfig::set ───► id, rate ∈ (0, 1]                            │
//! │  BulkDiscount::new ─────► threshold > 0, rebate > 0                    │
//! │                                                                         │
//! │  Every check runs eagerly, before any state is touched.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use grocer_core::validation::{validate_product_id, validate_quantity};
//!
//! assert!(validate_product_id("DRAGON_FRUIT").is_ok());
//! assert!(validate_quantity(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::DiscountRate;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product identifier.
pub const MAX_PRODUCT_ID_LEN: usize = 50;

/// Longest accepted product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product identifier.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 50 characters
/// - Only letters, digits, hyphens and underscores
///
/// ## Example
/// ```rust
/// use grocer_core::validation::validate_product_id;
///
/// assert!(validate_product_id("APPLE").is_ok());
/// assert!(validate_product_id("").is_err());
/// assert!(validate_product_id("RED APPLE").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    if id.chars().count() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "product id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "product id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (English or local).
pub fn validate_product_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a purchase quantity.
///
/// ## Rules
/// - Must be zero or more (zero means "not purchased")
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
            value: qty,
        });
    }

    Ok(())
}

/// Validates that an amount is strictly positive.
///
/// Used for unit prices, bulk thresholds and bulk rebates.
///
/// ## Example
/// ```rust
/// use grocer_core::money::Money;
/// use grocer_core::validation::validate_positive_amount;
///
/// assert!(validate_positive_amount("price", Money::from_cents(800)).is_ok());
/// assert!(validate_positive_amount("price", Money::zero()).is_err());
/// ```
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a discount multiplier in basis points.
///
/// ## Rules
/// - Must be in (0, 10000], i.e. (0, 1]
/// - 10000 means full price
pub fn validate_discount_rate_bps(bps: i64) -> ValidationResult<()> {
    if bps <= 0 || bps > DiscountRate::SCALE as i64 {
        return Err(ValidationError::OutOfRange {
            field: "discount rate".to_string(),
            min: "0 (exclusive)".to_string(),
            max: "1".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
