//! # Service Errors
//!
//! Errors raised by configuration loading and the pricing façade.
//!
//! ```text
//! CoreError ──────┐
//! io::Error ──────┤
//! toml errors ────┼──► ServiceError ──► caller / demo output
//! bad config ─────┤
//! unknown promo ──┘
//! ```

use grocer_core::{CoreError, ValidationError};
use thiserror::Error;

/// Errors from the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A pricing or validation failure from grocer-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Reading the config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or has the wrong shape.
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The config parsed but holds values the domain rejects.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No discount profile with this name.
    #[error("Unknown promotion: {0}")]
    UnknownPromotion(String),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(err.into())
    }
}

/// Convenience type alias for Results with ServiceError.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_wraps_into_core() {
        let err: ServiceError = ValidationError::Required {
            field: "product id".into(),
        }
        .into();
        assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ServiceError::UnknownPromotion("summer".into()).to_string(),
            "Unknown promotion: summer"
        );
        assert_eq!(
            ServiceError::Core(CoreError::ProductNotFound("KIWI".into())).to_string(),
            "Product not found in catalog: KIWI"
        );
    }
}
