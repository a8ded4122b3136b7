use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::record::MembershipRecord;
use crate::error::PricingError;
use crate::pricing::discount::apply_member_discount;
use crate::types::*;
use crate::PricingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Membership fees as listed for one tier and country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipFeeSchedule {
    pub quarterly_fee: Money,
    pub half_yearly_fee: Money,
    pub annual_fee: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_fee: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberPriceInput {
    pub fees: MembershipFeeSchedule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_discount_percentage: Option<Percent>,
    /// Explicit flag; takes precedence over `membership`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership: Option<MembershipRecord>,
    /// Date membership activity is judged on; required with `membership`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPriceLine {
    pub label: String,
    pub list_price: Money,
    pub member_price: Money,
    pub saving: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPriceOutput {
    pub is_active_member: bool,
    pub discount_percentage: Percent,
    pub lines: Vec<MemberPriceLine>,
}

// ---------------------------------------------------------------------------
// Main calculation
// ---------------------------------------------------------------------------

/// Discount every line of a membership fee schedule independently.
pub fn calculate_member_prices(
    input: &MemberPriceInput,
) -> PricingResult<ComputationOutput<MemberPriceOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let is_active = resolve_activity(input, &mut warnings)?;
    let pct = input.membership_discount_percentage;
    if is_active && pct.map_or(true, |p| p.is_zero()) {
        warnings.push("Active member but no membership discount is configured".into());
    }

    let fees = &input.fees;
    let mut listed = vec![
        ("quarterly", fees.quarterly_fee),
        ("half_yearly", fees.half_yearly_fee),
        ("annual", fees.annual_fee),
    ];
    if let Some(platform_fee) = fees.platform_fee {
        listed.push(("platform_fee", platform_fee));
    }

    let lines = listed
        .into_iter()
        .map(|(label, list_price)| {
            let member_price =
                apply_member_discount(list_price, pct, is_active).map_err(|e| match e {
                    PricingError::InvalidArgument { field, reason } if field == "amount" => {
                        PricingError::InvalidArgument {
                            field: label.to_string(),
                            reason,
                        }
                    }
                    other => other,
                })?;
            Ok(MemberPriceLine {
                label: label.to_string(),
                list_price,
                member_price,
                saving: list_price - member_price,
            })
        })
        .collect::<PricingResult<Vec<_>>>()?;

    let output = MemberPriceOutput {
        is_active_member: is_active,
        discount_percentage: pct.unwrap_or(Decimal::ZERO),
        lines,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Membership Pricing: per-line member discount",
        &serde_json::json!({
            "membership_discount_percentage": pct.map(|p| p.to_string()),
            "is_active_member": is_active,
            "rounding": "1 decimal place, half away from zero",
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn resolve_activity(input: &MemberPriceInput, warnings: &mut Vec<String>) -> PricingResult<bool> {
    if let Some(flag) = input.is_active_member {
        if input.membership.is_some() {
            warnings.push("is_active_member overrides the membership record".into());
        }
        return Ok(flag);
    }
    match (&input.membership, input.as_of) {
        (Some(record), Some(as_of)) => Ok(record.is_active_on(as_of)),
        (Some(_), None) => Err(PricingError::invalid(
            "as_of",
            "A date is required to judge the membership record",
        )),
        (None, _) => Ok(false),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
