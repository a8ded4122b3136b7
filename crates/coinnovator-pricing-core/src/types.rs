use std::fmt;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;
use crate::PricingResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed on a 0-100 scale (15 = 15%), as configured by
/// administrators. Divide by 100 before applying.
pub type Percent = Decimal;

/// Fee multipliers (e.g. 1.5x management fee for a "Medium" challenge)
pub type Multiple = Decimal;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    GBP,
    #[default]
    USD,
    EUR,
    INR,
    CHF,
    JPY,
    CAD,
    AUD,
    SGD,
    AED,
    Other(String),
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of an engagement model row (e.g. `market_place`)
    EngagementModelId
);
string_id!(
    /// Identifier of a pricing formula row
    FormulaId
);
string_id!(
    /// Identifier of a complexity level row
    ComplexityLevelId
);

/// `a * b`, with an overflow of the 96-bit mantissa reported against `field`.
pub fn checked_product(field: &str, a: Decimal, b: Decimal) -> PricingResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| PricingError::invalid(field, format!("overflow computing {a} * {b}")))
}

/// `amount * pct / 100`
pub fn percent_of(field: &str, amount: Money, pct: Percent) -> PricingResult<Money> {
    Ok(checked_product(field, amount, pct)? / HUNDRED)
}

/// Reject a value below zero.
pub(crate) fn ensure_non_negative(field: &str, value: Decimal) -> PricingResult<()> {
    if value < Decimal::ZERO {
        return Err(PricingError::invalid(
            field,
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

/// Reject a percentage outside [0, 100].
pub(crate) fn ensure_percentage(field: &str, value: Percent) -> PricingResult<()> {
    if value < Decimal::ZERO || value > HUNDRED {
        return Err(PricingError::invalid(
            field,
            format!("must be between 0 and 100, got {value}"),
        ));
    }
    Ok(())
}

/// Convert an `f64` arriving from a JavaScript caller. NaN and infinities
/// have no decimal representation and are rejected.
pub fn decimal_from_f64(field: &str, value: f64) -> PricingResult<Decimal> {
    if !value.is_finite() {
        return Err(PricingError::invalid(
            field,
            format!("must be a finite number, got {value}"),
        ));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| PricingError::invalid(field, format!("{value} is out of range")))
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of("fee", dec!(10000), dec!(10)).unwrap(), dec!(1000));
        assert_eq!(percent_of("fee", dec!(0), dec!(55)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_percent_of_overflow_is_an_error() {
        let err = percent_of("base_fee", Decimal::MAX, dec!(10)).unwrap_err();
        assert!(matches!(err, PricingError::InvalidArgument { ref field, .. } if field == "base_fee"));
    }

    #[test]
    fn test_percentage_bounds() {
        assert!(ensure_percentage("pct", dec!(0)).is_ok());
        assert!(ensure_percentage("pct", dec!(100)).is_ok());
        assert!(ensure_percentage("pct", dec!(100.01)).is_err());
        assert!(ensure_percentage("pct", dec!(-0.5)).is_err());
    }

    #[test]
    fn test_decimal_from_f64_rejects_nan() {
        match decimal_from_f64("amount", f64::NAN).unwrap_err() {
            PricingError::InvalidArgument { field, .. } => assert_eq!(field, "amount"),
            other => panic!("Expected InvalidArgument, got: {other}"),
        }
        assert!(decimal_from_f64("amount", f64::INFINITY).is_err());
        assert_eq!(decimal_from_f64("amount", 12.5).unwrap(), dec!(12.5));
    }

    #[test]
    fn test_typed_id_serializes_as_plain_string() {
        let id = EngagementModelId::new("market_place");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"market_place\"");
        assert_eq!(id.to_string(), "market_place");
    }
}
