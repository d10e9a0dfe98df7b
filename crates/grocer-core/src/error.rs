//! # Error Types
//!
//! Domain-specific error types for grocer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  grocer-core errors (this file)                                        │
//! │  ├── CoreError        - Pricing failures                               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  grocer-service errors (separate crate)                                │
//! │  └── ServiceError     - Config loading, unknown promotions             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → Presentation       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Kinds
//! Callers that only care about the category of failure use
//! [`CoreError::kind`]:
//! - [`ErrorKind::InvalidArgument`] - every [`ValidationError`]
//! - [`ErrorKind::NotFound`] - a purchase references a product that has
//!   since been removed from the catalog
//!
//! Messages are plain English; localisation belongs to presentation code.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A purchase holds a quantity for a product that is no longer in the
    /// catalog at calculation time.
    ///
    /// ## When This Occurs
    /// ```text
    /// purchase.add_quantity(&catalog, "MANGO", 2)   ✓ MANGO exists
    /// catalog.remove_product("MANGO")               ✓ removed
    /// rule.calculate_total(&purchase, &catalog)     ✗ ProductNotFound("MANGO")
    /// ```
    /// The line item is never skipped or priced at zero.
    #[error("Product not found in catalog: {0}")]
    ProductNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Structured category of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: negative quantity, out-of-range rate, malformed product,
    /// or an amount too large to represent.
    InvalidArgument,
    /// Catalog and purchase disagree about which products exist.
    NotFound,
}

impl CoreError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ProductNotFound(_) => ErrorKind::NotFound,
            CoreError::Validation(_) => ErrorKind::InvalidArgument,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised eagerly at the point of mutation or calculation entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. unparsable amount, bad identifier characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative, got {value}")]
    MustNotBeNegative { field: String, value: i64 },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// An amount or quantity left the representable range.
    #[error("{field} is too large")]
    Overflow { field: String },

    /// The identifier is not present in the catalog the purchase is bound to.
    #[error("Product {product_id} is not in the catalog")]
    NotInCatalog { product_id: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound("MANGO".to_string());
        assert_eq!(err.to_string(), "Product not found in catalog: MANGO");

        let err = ValidationError::MustNotBeNegative {
            field: "quantity".to_string(),
            value: -3,
        };
        assert_eq!(err.to_string(), "quantity must not be negative, got -3");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_overflow_is_invalid_argument() {
        let err: CoreError = ValidationError::Overflow {
            field: "total".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Validation error: total is too large");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_missing_product_is_not_found_kind() {
        let err = CoreError::ProductNotFound("DURIAN".into());
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
