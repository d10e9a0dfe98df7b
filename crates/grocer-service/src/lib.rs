//! # grocer-service: Configuration and Pricing Façade
//!
//! Everything around grocer-core that touches the outside world.
//!
//! ## Module Organization
//! ```text
//! grocer_service/
//! ├── lib.rs          ◄─── You are here (exports & tracing setup)
//! ├── config.rs       ◄─── pricing.toml + GROCER_* overrides
//! ├── service.rs      ◄─── PricingService and customer scenarios
//! ├── error.rs        ◄─── ServiceError
//! └── bin/
//!     └── grocer-demo.rs  ◄─── Prints the scenarios
//! ```
//!
//! ## Startup
//! ```text
//! init_tracing() ──► PricingConfig::load_or_default() ──► PricingService::from_config()
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use config::{CatalogSeed, PricingConfig};
pub use error::{ServiceError, ServiceResult};
pub use service::PricingService;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,grocer_core=debug,grocer_service=debug";

/// Installs the global fmt subscriber.
///
/// Honors `RUST_LOG`; falls back to [`DEFAULT_LOG_FILTER`]. Calling it
/// twice is harmless, the second install is ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
