use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::complexity::{ComplexityLevel, ComplexityMultipliers, ComplexityTable};
use super::discount::apply_member_discount;
use super::engagement::{EngagementModel, EngagementModelRegistry, FeeComponent};
use super::formula::{compute_components, FormulaConfig};
use crate::error::PricingError;
use crate::types::*;
use crate::PricingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What to do when the requested complexity level is not in the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingComplexityPolicy {
    /// Fail with `PricingError::NotFound`
    #[default]
    Reject,
    /// Price at 1x and record a warning on the output
    UnitMultiplier,
}

/// Formula inputs echoed back so a quoted price can be explained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaInputs {
    pub platform_percentage: Percent,
    pub base_management_fee: Money,
    pub base_consulting_fee: Money,
    pub advance_percentage: Percent,
}

/// Fee lines after the membership discount, each discounted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPricing {
    pub discount_percentage: Percent,
    pub platform_usage_fee: Money,
    pub management_fee: Money,
    pub consulting_fee: Money,
    pub total_fee: Money,
    pub advance_payment: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// The base (solution) fee the platform percentage is applied to
    pub solution_fee: Money,
    pub platform_usage_fee: Money,
    pub management_fee: Money,
    pub consulting_fee: Money,
    /// Sum of the components the engagement model charges
    pub total_fee: Money,
    pub advance_payment: Money,
    pub complexity_level: String,
    pub management_multiplier: Multiple,
    pub consulting_multiplier: Multiple,
    /// Display name of the engagement model
    pub engagement_model: String,
    pub engagement_model_id: EngagementModelId,
    pub included_components: Vec<FeeComponent>,
    pub breakdown: FormulaInputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_pricing: Option<MemberPricing>,
}

/// Reference data a calculation resolves against.
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    pub complexity: &'a ComplexityTable,
    pub models: &'a EngagementModelRegistry,
    pub missing_complexity: MissingComplexityPolicy,
}

/// Self-contained calculation request, as sent by the admin UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeCalculationInput {
    pub formula: FormulaConfig,
    pub base_fee: Money,
    pub complexity_level: String,
    #[serde(default)]
    pub is_active_member: bool,
    pub complexity_levels: Vec<ComplexityLevel>,
    /// Registered on top of the standard engagement models
    #[serde(default)]
    pub engagement_models: Vec<EngagementModel>,
    #[serde(default)]
    pub missing_complexity: MissingComplexityPolicy,
}

// ---------------------------------------------------------------------------
// Main calculation
// ---------------------------------------------------------------------------

/// Calculate the fee breakdown for a self-contained request.
pub fn calculate_fees(
    input: &FeeCalculationInput,
) -> PricingResult<ComputationOutput<FeeBreakdown>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let complexity = ComplexityTable::new(input.complexity_levels.clone())?;
    let mut models = EngagementModelRegistry::standard();
    for model in &input.engagement_models {
        models.register(model.clone())?;
    }
    let ctx = PricingContext {
        complexity: &complexity,
        models: &models,
        missing_complexity: input.missing_complexity,
    };

    let output = calculate_breakdown(
        &ctx,
        &input.formula,
        input.base_fee,
        &input.complexity_level,
        input.is_active_member,
        &mut warnings,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Challenge Pricing: Platform, Management and Consulting Fees",
        &formula_assumptions(&input.formula, input.base_fee, &input.complexity_level),
        warnings,
        elapsed,
        output,
    ))
}

/// Resolve complexity, compute the fee lines, total them with the formula's
/// engagement model and derive the advance payment.
pub fn calculate_breakdown(
    ctx: &PricingContext<'_>,
    formula: &FormulaConfig,
    base_fee: Money,
    complexity_level: &str,
    is_active_member: bool,
    warnings: &mut Vec<String>,
) -> PricingResult<FeeBreakdown> {
    // ------------------------------------------------------------------
    // 1. Complexity multipliers
    // ------------------------------------------------------------------
    let multipliers = resolve_multipliers(ctx, complexity_level, warnings)?;

    // ------------------------------------------------------------------
    // 2. Engagement model
    // ------------------------------------------------------------------
    let model_id = formula.engagement_model_id.as_ref().ok_or_else(|| {
        PricingError::invalid(
            "engagement_model_id",
            format!("Formula '{}' has no engagement model", formula.id),
        )
    })?;
    let model = ctx.models.get(model_id)?;

    // ------------------------------------------------------------------
    // 3. Fee lines, total and advance
    // ------------------------------------------------------------------
    ensure_percentage(
        "advance_payment_percentage",
        formula.advance_payment_percentage,
    )?;
    let components = compute_components(formula, base_fee, &multipliers)?;
    let total_fee = model.total(&components)?;
    let advance_payment = percent_of(
        "total_fee",
        total_fee,
        formula.advance_payment_percentage,
    )?;

    debug!(
        formula = %formula.id,
        model = %model.id,
        %base_fee,
        %total_fee,
        %advance_payment,
        "calculated fee breakdown"
    );

    // ------------------------------------------------------------------
    // 4. Membership discount, per line
    // ------------------------------------------------------------------
    if let Some(pct) = formula.membership_discount_percentage {
        ensure_percentage("membership_discount_percentage", pct)?;
    }
    let member_pricing = match formula.membership_discount_percentage {
        Some(pct) if is_active_member && pct > Decimal::ZERO => {
            let discount = |amount: Money| apply_member_discount(amount, Some(pct), true);
            Some(MemberPricing {
                discount_percentage: pct,
                platform_usage_fee: discount(components.platform_usage_fee)?,
                management_fee: discount(components.management_fee)?,
                consulting_fee: discount(components.consulting_fee)?,
                total_fee: discount(total_fee)?,
                advance_payment: discount(advance_payment)?,
            })
        }
        _ => None,
    };

    Ok(FeeBreakdown {
        solution_fee: base_fee,
        platform_usage_fee: components.platform_usage_fee,
        management_fee: components.management_fee,
        consulting_fee: components.consulting_fee,
        total_fee,
        advance_payment,
        complexity_level: complexity_level.to_string(),
        management_multiplier: multipliers.management_fee_multiplier,
        consulting_multiplier: multipliers.consulting_fee_multiplier,
        engagement_model: model.name.clone(),
        engagement_model_id: model.id.clone(),
        included_components: model.components.clone(),
        breakdown: FormulaInputs {
            platform_percentage: formula.platform_usage_fee_percentage,
            base_management_fee: formula.base_management_fee,
            base_consulting_fee: formula.base_consulting_fee,
            advance_percentage: formula.advance_payment_percentage,
        },
        member_pricing,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_multipliers(
    ctx: &PricingContext<'_>,
    complexity_level: &str,
    warnings: &mut Vec<String>,
) -> PricingResult<ComplexityMultipliers> {
    match ctx.complexity.resolve(complexity_level) {
        Ok(m) => Ok(m),
        Err(PricingError::NotFound { .. })
            if ctx.missing_complexity == MissingComplexityPolicy::UnitMultiplier =>
        {
            warn!(complexity = complexity_level, "complexity level not found, pricing at 1x");
            warnings.push(format!(
                "Complexity level '{complexity_level}' not found; management and consulting fees priced at 1x"
            ));
            Ok(ComplexityMultipliers::UNIT)
        }
        Err(e) => Err(e),
    }
}

pub(crate) fn formula_assumptions(
    formula: &FormulaConfig,
    base_fee: Money,
    complexity_level: &str,
) -> serde_json::Value {
    serde_json::json!({
        "formula_id": formula.id.to_string(),
        "engagement_model_id": formula.engagement_model_id.as_ref().map(|id| id.to_string()),
        "country": formula.country,
        "base_fee": base_fee.to_string(),
        "complexity_level": complexity_level,
        "platform_usage_fee_percentage": formula.platform_usage_fee_percentage.to_string(),
        "advance_payment_percentage": formula.advance_payment_percentage.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
