//! Property-based tests for the pricing engine.
//!
//! - platform usage fee is exactly the configured share of the base fee
//! - a model's total never includes a fee line the model excludes
//! - a discount that does not apply leaves the amount unchanged
//! - an applied discount strictly lowers any amount it can move
//! - validation reports every violated rule

use coinnovator_pricing_core::pricing::complexity::ComplexityMultipliers;
use coinnovator_pricing_core::pricing::discount::apply_member_discount;
use coinnovator_pricing_core::pricing::engagement::{
    EngagementModelRegistry, FeeComponent, FeeComponents, AGGREGATOR,
};
use coinnovator_pricing_core::pricing::formula::{compute_components, FormulaConfig};
use coinnovator_pricing_core::pricing::validation::validate_formula;
use coinnovator_pricing_core::{EngagementModelId, FormulaId};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Non-negative amount with two decimal places, up to 10 million
fn money() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Percentage in [0, 100] with two decimal places
fn percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|bp| Decimal::new(bp, 2))
}

/// Multiplier in [0, 5] with two decimal places
fn multiple() -> impl Strategy<Value = Decimal> {
    (0i64..=500).prop_map(|m| Decimal::new(m, 2))
}

fn formula(platform: Decimal, mgmt: Decimal, consulting: Decimal) -> FormulaConfig {
    FormulaConfig {
        id: FormulaId::new("prop"),
        formula_name: "Property".into(),
        engagement_model_id: Some(EngagementModelId::new(AGGREGATOR)),
        country: None,
        currency: None,
        platform_usage_fee_percentage: platform,
        base_management_fee: mgmt,
        base_consulting_fee: consulting,
        advance_payment_percentage: Decimal::new(20, 0),
        membership_discount_percentage: None,
        is_active: true,
    }
}

proptest! {
    #[test]
    fn prop_platform_fee_is_exact_share(
        base_fee in money(),
        pct in percent(),
        mgmt in money(),
        mm in multiple(),
        cm in multiple(),
    ) {
        let f = formula(pct, mgmt, mgmt);
        let multipliers = ComplexityMultipliers {
            management_fee_multiplier: mm,
            consulting_fee_multiplier: cm,
        };
        let c = compute_components(&f, base_fee, &multipliers).unwrap();
        prop_assert_eq!(c.platform_usage_fee, base_fee * pct / Decimal::ONE_HUNDRED);
        prop_assert_eq!(c.management_fee, mgmt * mm);
        prop_assert_eq!(c.consulting_fee, mgmt * cm);
    }

    #[test]
    fn prop_total_only_sums_included_components(
        platform in money(),
        management in money(),
        consulting in money(),
    ) {
        let components = FeeComponents {
            platform_usage_fee: platform,
            management_fee: management,
            consulting_fee: consulting,
        };
        let registry = EngagementModelRegistry::standard();
        for model in registry.models() {
            let total = registry.compute_total(&model.id, &components).unwrap();
            let mut expected = platform;
            if model.includes(FeeComponent::Management) {
                expected += management;
            }
            if model.includes(FeeComponent::Consulting) {
                expected += consulting;
            }
            prop_assert_eq!(total, expected, "model {}", model.id);
        }

        let aggregator = registry
            .compute_total(&EngagementModelId::new(AGGREGATOR), &components)
            .unwrap();
        prop_assert_eq!(aggregator, platform);
    }

    #[test]
    fn prop_discount_identity(amount in money(), pct in percent()) {
        prop_assert_eq!(apply_member_discount(amount, Some(pct), false).unwrap(), amount);
        prop_assert_eq!(apply_member_discount(amount, Some(Decimal::ZERO), true).unwrap(), amount);
        prop_assert_eq!(apply_member_discount(amount, None, true).unwrap(), amount);
    }

    /// Whole-currency amounts of at least 10 and whole percentages keep the
    /// discount at 0.1 or more, which one-decimal rounding cannot swallow.
    #[test]
    fn prop_discount_strictly_lowers(amount in 10i64..10_000_000, pct in 1i64..=100) {
        let amount = Decimal::from(amount);
        let discounted = apply_member_discount(amount, Some(Decimal::from(pct)), true).unwrap();
        prop_assert!(discounted < amount);
        prop_assert!(discounted >= Decimal::ZERO);
        prop_assert!(discounted.scale() <= 1);
    }

    #[test]
    fn prop_validation_collects_every_error(
        over in 1i64..1_000,
        negative in 1i64..1_000_000,
    ) {
        let mut f = formula(Decimal::ONE_HUNDRED + Decimal::from(over), -Decimal::from(negative), Decimal::ZERO);
        f.advance_payment_percentage = -Decimal::from(over);
        let v = validate_formula(&f);
        prop_assert!(!v.is_valid);
        prop_assert_eq!(v.errors.len(), 3);
    }
}
