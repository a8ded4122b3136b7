use coinnovator_pricing_core::catalog::{PricingCatalog, QuoteRequest};
use coinnovator_pricing_core::membership::schedule::{self, MemberPriceInput};
use coinnovator_pricing_core::pricing::calculator::{self, FeeCalculationInput};
use coinnovator_pricing_core::pricing::discount;
use coinnovator_pricing_core::pricing::formula::FormulaConfig;
use coinnovator_pricing_core::pricing::validation;
use coinnovator_pricing_core::decimal_from_f64;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::prelude::ToPrimitive;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Fee calculation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_fees(input_json: String) -> NapiResult<String> {
    let input: FeeCalculationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = calculator::calculate_fees(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn quote(catalog_json: String, request_json: String) -> NapiResult<String> {
    let catalog = PricingCatalog::from_json(&catalog_json).map_err(to_napi_error)?;
    let request: QuoteRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output = catalog.quote(&request).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formula administration
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_formula(formula_json: String) -> NapiResult<String> {
    let formula: FormulaConfig = serde_json::from_str(&formula_json).map_err(to_napi_error)?;
    let result = validation::validate_formula(&formula);
    serde_json::to_string(&result).map_err(to_napi_error)
}

#[napi]
pub fn validate_catalog(catalog_json: String) -> NapiResult<String> {
    let catalog = PricingCatalog::from_json(&catalog_json).map_err(to_napi_error)?;
    serde_json::to_string(&catalog.summary()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

#[napi]
pub fn member_prices(input_json: String) -> NapiResult<String> {
    let input: MemberPriceInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::calculate_member_prices(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Discount a single displayed amount. Takes and returns JS numbers.
#[napi]
pub fn apply_member_discount(
    amount: f64,
    discount_percentage: Option<f64>,
    is_active_member: bool,
) -> NapiResult<f64> {
    let amount = decimal_from_f64("amount", amount).map_err(to_napi_error)?;
    let pct = discount_percentage
        .map(|p| decimal_from_f64("discount_percentage", p))
        .transpose()
        .map_err(to_napi_error)?;
    let discounted =
        discount::apply_member_discount(amount, pct, is_active_member).map_err(to_napi_error)?;
    discounted
        .to_f64()
        .ok_or_else(|| to_napi_error(format!("{discounted} cannot be represented as a number")))
}
