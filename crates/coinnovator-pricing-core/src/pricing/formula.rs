use serde::{Deserialize, Serialize};

use super::complexity::ComplexityMultipliers;
use super::engagement::FeeComponents;
use crate::types::*;
use crate::PricingResult;

/// Pricing formula configured by an administrator for one engagement model,
/// optionally scoped to a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaConfig {
    pub id: FormulaId,
    #[serde(default)]
    pub formula_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_model_id: Option<EngagementModelId>,
    /// Country scope; `None` applies to every country without its own formula
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// Percentage of the solution fee (0-100)
    pub platform_usage_fee_percentage: Percent,
    pub base_management_fee: Money,
    pub base_consulting_fee: Money,
    /// Share of the total fee payable upfront (0-100)
    pub advance_payment_percentage: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_discount_percentage: Option<Percent>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Compute the platform, management and consulting fee lines.
///
/// Management and consulting fees are flat amounts scaled by complexity and
/// do not depend on `base_fee`, so they are non-zero even for a zero
/// solution fee.
pub fn compute_components(
    formula: &FormulaConfig,
    base_fee: Money,
    multipliers: &ComplexityMultipliers,
) -> PricingResult<FeeComponents> {
    ensure_non_negative("base_fee", base_fee)?;
    ensure_percentage(
        "platform_usage_fee_percentage",
        formula.platform_usage_fee_percentage,
    )?;
    ensure_non_negative("base_management_fee", formula.base_management_fee)?;
    ensure_non_negative("base_consulting_fee", formula.base_consulting_fee)?;
    ensure_non_negative(
        "management_fee_multiplier",
        multipliers.management_fee_multiplier,
    )?;
    ensure_non_negative(
        "consulting_fee_multiplier",
        multipliers.consulting_fee_multiplier,
    )?;

    Ok(FeeComponents {
        platform_usage_fee: percent_of(
            "base_fee",
            base_fee,
            formula.platform_usage_fee_percentage,
        )?,
        management_fee: checked_product(
            "base_management_fee",
            formula.base_management_fee,
            multipliers.management_fee_multiplier,
        )?,
        consulting_fee: checked_product(
            "base_consulting_fee",
            formula.base_consulting_fee,
            multipliers.consulting_fee_multiplier,
        )?,
    })
}
