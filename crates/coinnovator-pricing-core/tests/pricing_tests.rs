use coinnovator_pricing_core::pricing::calculator::{
    calculate_fees, FeeCalculationInput, MissingComplexityPolicy,
};
use coinnovator_pricing_core::pricing::complexity::ComplexityLevel;
use coinnovator_pricing_core::pricing::discount::apply_member_discount;
use coinnovator_pricing_core::pricing::engagement::{
    EngagementModelRegistry, FeeComponent, AGGREGATOR, MARKET_PLACE, MARKET_PLACE_AGGREGATOR,
    PLATFORM_AS_A_SERVICE,
};
use coinnovator_pricing_core::pricing::formula::FormulaConfig;
use coinnovator_pricing_core::pricing::validation::validate_formula;
use coinnovator_pricing_core::{ComplexityLevelId, EngagementModelId, FormulaId, PricingError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn levels() -> Vec<ComplexityLevel> {
    vec![
        ComplexityLevel {
            id: ComplexityLevelId::new("cx-low"),
            name: "Low".into(),
            management_fee_multiplier: dec!(1),
            consulting_fee_multiplier: dec!(1),
            sort_order: 1,
        },
        ComplexityLevel {
            id: ComplexityLevelId::new("cx-medium"),
            name: "Medium".into(),
            management_fee_multiplier: dec!(1.5),
            consulting_fee_multiplier: dec!(2),
            sort_order: 2,
        },
        ComplexityLevel {
            id: ComplexityLevelId::new("cx-high"),
            name: "High".into(),
            management_fee_multiplier: dec!(2),
            consulting_fee_multiplier: dec!(3),
            sort_order: 3,
        },
    ]
}

fn formula(model: &str) -> FormulaConfig {
    FormulaConfig {
        id: FormulaId::new("formula-1"),
        formula_name: "Global standard".into(),
        engagement_model_id: Some(EngagementModelId::new(model)),
        country: None,
        currency: None,
        platform_usage_fee_percentage: dec!(10),
        base_management_fee: dec!(500),
        base_consulting_fee: dec!(300),
        advance_payment_percentage: dec!(20),
        membership_discount_percentage: None,
        is_active: true,
    }
}

fn request(model: &str, level: &str) -> FeeCalculationInput {
    FeeCalculationInput {
        formula: formula(model),
        base_fee: dec!(10000),
        complexity_level: level.into(),
        is_active_member: false,
        complexity_levels: levels(),
        engagement_models: Vec::new(),
        missing_complexity: MissingComplexityPolicy::Reject,
    }
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn test_market_place_and_aggregator_example() {
    let out = calculate_fees(&request(MARKET_PLACE_AGGREGATOR, "Medium"))
        .unwrap()
        .result;
    assert_eq!(out.platform_usage_fee, dec!(1000));
    assert_eq!(out.management_fee, dec!(750));
    assert_eq!(out.consulting_fee, dec!(600));
    assert_eq!(out.total_fee, dec!(2350));
    assert_eq!(out.advance_payment, dec!(470));
}

#[test]
fn test_aggregator_example() {
    let out = calculate_fees(&request(AGGREGATOR, "Medium")).unwrap().result;
    assert_eq!(out.total_fee, dec!(1000));
    assert_eq!(out.advance_payment, dec!(200));
}

#[test]
fn test_member_discount_example() {
    let discounted = apply_member_discount(dec!(1000), Some(dec!(15)), true).unwrap();
    assert_eq!(discounted, dec!(850.0));
}

// ===========================================================================
// Engagement model table
// ===========================================================================

#[test]
fn test_totals_for_every_standard_model() {
    let cases = [
        (MARKET_PLACE, "Market Place", dec!(1750)),
        (MARKET_PLACE_AGGREGATOR, "Market Place & Aggregator", dec!(2350)),
        (PLATFORM_AS_A_SERVICE, "Platform as a Service", dec!(1600)),
        (AGGREGATOR, "Aggregator", dec!(1000)),
    ];
    for (model, name, expected) in cases {
        let out = calculate_fees(&request(model, "Medium")).unwrap().result;
        assert_eq!(out.engagement_model, name);
        assert_eq!(out.total_fee, expected, "total for {model}");
        assert_eq!(out.advance_payment, expected * dec!(0.2), "advance for {model}");
    }
}

#[test]
fn test_standard_registry_components() {
    let registry = EngagementModelRegistry::standard();
    let paas = registry
        .get(&EngagementModelId::new(PLATFORM_AS_A_SERVICE))
        .unwrap();
    assert_eq!(
        paas.components,
        vec![FeeComponent::PlatformUsage, FeeComponent::Consulting]
    );
    assert!(registry.models().all(|m| m.includes(FeeComponent::PlatformUsage)));
}

#[test]
fn test_complexity_scales_flat_fees_only() {
    let low = calculate_fees(&request(MARKET_PLACE_AGGREGATOR, "Low"))
        .unwrap()
        .result;
    let high = calculate_fees(&request(MARKET_PLACE_AGGREGATOR, "High"))
        .unwrap()
        .result;
    assert_eq!(low.platform_usage_fee, high.platform_usage_fee);
    assert_eq!(low.total_fee, dec!(1800));
    assert_eq!(high.total_fee, dec!(2900));
}

#[test]
fn test_zero_base_fee() {
    let mut req = request(MARKET_PLACE_AGGREGATOR, "Medium");
    req.base_fee = Decimal::ZERO;
    let out = calculate_fees(&req).unwrap().result;
    assert_eq!(out.platform_usage_fee, Decimal::ZERO);
    assert_eq!(out.total_fee, dec!(1350));
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn test_missing_configuration_is_not_a_free_price() {
    let mut req = request(MARKET_PLACE, "Medium");
    req.complexity_levels = Vec::new();
    let err = calculate_fees(&req).unwrap_err();
    assert!(matches!(err, PricingError::NotFound { .. }));
    assert_eq!(err.to_string(), "Not found: complexity level 'Medium'");
}

#[test]
fn test_negative_base_fee() {
    let mut req = request(MARKET_PLACE, "Medium");
    req.base_fee = dec!(-500);
    match calculate_fees(&req).unwrap_err() {
        PricingError::InvalidArgument { field, .. } => assert_eq!(field, "base_fee"),
        other => panic!("Expected InvalidArgument, got: {other}"),
    }
}

#[test]
fn test_validation_reports_both_errors() {
    let mut f = formula(MARKET_PLACE);
    f.base_management_fee = dec!(-10);
    f.platform_usage_fee_percentage = dec!(150);
    let v = validate_formula(&f);
    assert!(!v.is_valid);
    assert_eq!(v.errors.len(), 2);
}

#[test]
fn test_request_round_trips_through_json() {
    let json = serde_json::json!({
        "formula": {
            "id": "f-json",
            "formula_name": "PaaS",
            "engagement_model_id": "platform_as_a_service",
            "platform_usage_fee_percentage": "5",
            "base_management_fee": "1000",
            "base_consulting_fee": "250",
            "advance_payment_percentage": "50",
            "membership_discount_percentage": "20"
        },
        "base_fee": "20000",
        "complexity_level": "High",
        "is_active_member": true,
        "complexity_levels": [
            {"id": "h", "name": "High", "management_fee_multiplier": "2", "consulting_fee_multiplier": "3", "sort_order": 3}
        ]
    });
    let input: FeeCalculationInput = serde_json::from_value(json).unwrap();
    let out = calculate_fees(&input).unwrap().result;
    // 1000 + 750
    assert_eq!(out.total_fee, dec!(1750));
    assert_eq!(out.advance_payment, dec!(875));
    let member = out.member_pricing.unwrap();
    assert_eq!(member.total_fee, dec!(1400));
    assert_eq!(member.advance_payment, dec!(700));
}
