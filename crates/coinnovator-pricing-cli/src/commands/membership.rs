use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use coinnovator_pricing_core::membership::schedule::{
    self, MemberPriceInput, MembershipFeeSchedule,
};

use crate::input;

/// Arguments for member price calculation
#[derive(Args)]
pub struct MemberPriceArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Quarterly membership fee
    #[arg(long)]
    pub quarterly: Option<Decimal>,

    /// Half-yearly membership fee
    #[arg(long)]
    pub half_yearly: Option<Decimal>,

    /// Annual membership fee
    #[arg(long)]
    pub annual: Option<Decimal>,

    /// Platform fee
    #[arg(long)]
    pub platform_fee: Option<Decimal>,

    /// Membership discount percentage (0-100)
    #[arg(long)]
    pub discount: Option<Decimal>,

    /// Organization holds an active paid membership
    #[arg(long)]
    pub active: bool,
}

pub fn run_member_price(args: MemberPriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let price_input = if let Some(req) =
        input::read_request::<MemberPriceInput>(args.input.as_deref())?
    {
        req
    } else {
        let quarterly = args
            .quarterly
            .ok_or("--quarterly is required (or provide --input)")?;
        let half_yearly = args
            .half_yearly
            .ok_or("--half-yearly is required (or provide --input)")?;
        let annual = args.annual.ok_or("--annual is required (or provide --input)")?;

        MemberPriceInput {
            fees: MembershipFeeSchedule {
                quarterly_fee: quarterly,
                half_yearly_fee: half_yearly,
                annual_fee: annual,
                platform_fee: args.platform_fee,
                currency: None,
            },
            membership_discount_percentage: args.discount,
            is_active_member: Some(args.active),
            membership: None,
            as_of: None,
        }
    };

    let result = schedule::calculate_member_prices(&price_input)?;
    Ok(serde_json::to_value(result)?)
}
