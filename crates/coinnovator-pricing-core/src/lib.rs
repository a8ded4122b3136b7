pub mod error;
pub mod types;

#[cfg(feature = "pricing")]
pub mod pricing;

#[cfg(feature = "membership")]
pub mod membership;

#[cfg(feature = "catalog")]
pub mod catalog;

pub use error::PricingError;
pub use types::*;

/// Standard result type for all pricing operations
pub type PricingResult<T> = Result<T, PricingError>;
