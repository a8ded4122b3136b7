use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use coinnovator_pricing_core::catalog::QuoteRequest;
use coinnovator_pricing_core::pricing::calculator::{
    self, FeeCalculationInput, MissingComplexityPolicy,
};
use coinnovator_pricing_core::pricing::formula::FormulaConfig;
use coinnovator_pricing_core::pricing::validation;
use coinnovator_pricing_core::EngagementModelId;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MissingComplexity {
    /// Fail when the complexity level is unknown
    Reject,
    /// Price unknown complexity levels at 1x with a warning
    UnitMultiplier,
}

impl From<MissingComplexity> for MissingComplexityPolicy {
    fn from(m: MissingComplexity) -> Self {
        match m {
            MissingComplexity::Reject => MissingComplexityPolicy::Reject,
            MissingComplexity::UnitMultiplier => MissingComplexityPolicy::UnitMultiplier,
        }
    }
}

/// Arguments for a self-contained fee calculation
#[derive(Args)]
pub struct CalculateArgs {
    /// Path to JSON input file (formula, base fee, complexity levels)
    #[arg(long)]
    pub input: Option<String>,

    /// Override the request's handling of unknown complexity levels
    #[arg(long, value_enum)]
    pub missing_complexity: Option<MissingComplexity>,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut calc_input = input::read_request::<FeeCalculationInput>(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for calculate")?;
    if let Some(policy) = args.missing_complexity {
        calc_input.missing_complexity = policy.into();
    }

    let result = calculator::calculate_fees(&calc_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for quoting against a pricing catalog
#[derive(Args)]
pub struct QuoteArgs {
    /// Catalog file (JSON or YAML)
    #[arg(long, env = "COINNOVATOR_CATALOG")]
    pub catalog: String,

    /// Path to JSON quote request (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Engagement model id (e.g. market_place_aggregator)
    #[arg(long)]
    pub model: Option<String>,

    /// Country the challenge is priced for
    #[arg(long)]
    pub country: Option<String>,

    /// Complexity level name (e.g. Medium)
    #[arg(long)]
    pub complexity: Option<String>,

    /// Solution fee the platform percentage applies to
    #[arg(long)]
    pub base_fee: Option<Decimal>,

    /// Organization holds an active paid membership
    #[arg(long)]
    pub member: bool,
}

pub fn run_quote(args: QuoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = if let Some(req) = input::read_request::<QuoteRequest>(args.input.as_deref())?
    {
        req
    } else {
        let model = args.model.ok_or("--model is required (or provide --input)")?;
        let complexity = args
            .complexity
            .ok_or("--complexity is required (or provide --input)")?;
        let base_fee = args
            .base_fee
            .ok_or("--base-fee is required (or provide --input)")?;

        QuoteRequest {
            engagement_model_id: EngagementModelId::new(model),
            country: args.country,
            complexity_level: complexity,
            base_fee,
            is_active_member: args.member,
        }
    };

    let catalog = input::catalog::load_catalog(&args.catalog)?;
    let result = catalog.quote(&request)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for formula validation
#[derive(Args)]
pub struct ValidateFormulaArgs {
    /// Path to JSON formula file
    #[arg(long)]
    pub input: Option<String>,

    /// Exit with an error when the formula is invalid
    #[arg(long)]
    pub strict: bool,
}

pub fn run_validate_formula(
    args: ValidateFormulaArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let formula = input::read_request::<FormulaConfig>(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for validate-formula")?;

    if args.strict {
        validation::ensure_valid(&formula)?;
    }
    let result = validation::validate_formula(&formula);
    Ok(serde_json::json!({ "result": result }))
}
