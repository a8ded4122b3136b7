use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::formula::FormulaConfig;
use crate::error::PricingError;
use crate::PricingResult;

/// Every problem found in a formula, so a form can show them all at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Check a formula before it is saved. Does not short-circuit.
pub fn validate_formula(formula: &FormulaConfig) -> FormulaValidation {
    let mut errors = Vec::new();
    let hundred = Decimal::ONE_HUNDRED;

    if formula.formula_name.trim().is_empty() {
        errors.push("Formula name is required".to_string());
    }

    let has_model = formula
        .engagement_model_id
        .as_ref()
        .is_some_and(|id| !id.as_str().trim().is_empty());
    if !has_model {
        errors.push("Engagement model is required".to_string());
    }

    let platform = formula.platform_usage_fee_percentage;
    if platform < Decimal::ZERO || platform > hundred {
        errors.push("Platform usage fee percentage must be between 0 and 100".to_string());
    }

    if formula.base_management_fee < Decimal::ZERO {
        errors.push("Base management fee must be non-negative".to_string());
    }

    if formula.base_consulting_fee < Decimal::ZERO {
        errors.push("Base consulting fee must be non-negative".to_string());
    }

    let advance = formula.advance_payment_percentage;
    if advance < Decimal::ZERO || advance > hundred {
        errors.push("Advance payment percentage must be between 0 and 100".to_string());
    }

    if let Some(discount) = formula.membership_discount_percentage {
        if discount < Decimal::ZERO || discount > hundred {
            errors.push("Membership discount percentage must be between 0 and 100".to_string());
        }
    }

    FormulaValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Save-time gate: a failing validation becomes `PricingError::Configuration`.
pub fn ensure_valid(formula: &FormulaConfig) -> PricingResult<()> {
    let validation = validate_formula(formula);
    if validation.is_valid {
        Ok(())
    } else {
        Err(PricingError::Configuration(validation.errors))
    }
}
