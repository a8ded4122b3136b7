use rust_decimal::RoundingStrategy;

use crate::types::*;
use crate::PricingResult;

/// Decimal places kept on a member-discounted amount.
pub const MEMBER_PRICE_DP: u32 = 1;

/// Apply a membership discount to a single fee line.
///
/// Returns `amount` untouched when the member is inactive or there is no
/// discount. Otherwise returns `amount - amount * pct / 100` rounded to one
/// decimal place, halves rounded away from zero.
pub fn apply_member_discount(
    amount: Money,
    discount_percentage: Option<Percent>,
    is_active_member: bool,
) -> PricingResult<Money> {
    ensure_non_negative("amount", amount)?;
    if let Some(pct) = discount_percentage {
        ensure_percentage("discount_percentage", pct)?;
    }

    let pct = match discount_percentage {
        Some(pct) if is_active_member && !pct.is_zero() => pct,
        _ => return Ok(amount),
    };

    let discounted = amount - percent_of("amount", amount, pct)?;
    Ok(round_member_price(discounted))
}

/// One-decimal display rounding used for member prices only.
pub fn round_member_price(amount: Money) -> Money {
    amount.round_dp_with_strategy(MEMBER_PRICE_DP, RoundingStrategy::MidpointAwayFromZero)
}
