use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PricingError;
use crate::types::*;
use crate::PricingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A fee line that an engagement model may include in its total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeComponent {
    /// Percentage of the solution fee; charged under every model
    PlatformUsage,
    /// Flat management fee scaled by complexity
    Management,
    /// Flat consulting fee scaled by complexity
    Consulting,
}

impl fmt::Display for FeeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeeComponent::PlatformUsage => "platform_usage",
            FeeComponent::Management => "management",
            FeeComponent::Consulting => "consulting",
        };
        f.write_str(s)
    }
}

/// The three computed fee lines before any model decides which are charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeComponents {
    pub platform_usage_fee: Money,
    pub management_fee: Money,
    pub consulting_fee: Money,
}

impl FeeComponents {
    pub fn amount(&self, component: FeeComponent) -> Money {
        match component {
            FeeComponent::PlatformUsage => self.platform_usage_fee,
            FeeComponent::Management => self.management_fee,
            FeeComponent::Consulting => self.consulting_fee,
        }
    }
}

/// A commercial arrangement and the fee lines it bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementModel {
    pub id: EngagementModelId,
    /// Display name, never used for dispatch
    pub name: String,
    pub components: Vec<FeeComponent>,
}

impl EngagementModel {
    pub fn new(id: &str, name: &str, components: &[FeeComponent]) -> Self {
        EngagementModel {
            id: EngagementModelId::new(id),
            name: name.to_string(),
            components: components.to_vec(),
        }
    }

    pub fn includes(&self, component: FeeComponent) -> bool {
        self.components.contains(&component)
    }

    /// Sum of the fee lines this model charges.
    pub fn total(&self, components: &FeeComponents) -> PricingResult<Money> {
        self.components.iter().try_fold(Decimal::ZERO, |acc, c| {
            acc.checked_add(components.amount(*c)).ok_or_else(|| {
                PricingError::invalid("total_fee", format!("overflow adding the {c} fee"))
            })
        })
    }
}

pub const MARKET_PLACE: &str = "market_place";
pub const MARKET_PLACE_AGGREGATOR: &str = "market_place_aggregator";
pub const PLATFORM_AS_A_SERVICE: &str = "platform_as_a_service";
pub const AGGREGATOR: &str = "aggregator";

/// Strategy table: engagement model id to the fee lines summed into the total.
#[derive(Debug, Clone, Default)]
pub struct EngagementModelRegistry {
    models: BTreeMap<EngagementModelId, EngagementModel>,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

impl EngagementModelRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The four models the platform ships with.
    pub fn standard() -> Self {
        use FeeComponent::*;

        let mut models = BTreeMap::new();
        for model in [
            EngagementModel::new(MARKET_PLACE, "Market Place", &[PlatformUsage, Management]),
            EngagementModel::new(
                MARKET_PLACE_AGGREGATOR,
                "Market Place & Aggregator",
                &[PlatformUsage, Management, Consulting],
            ),
            EngagementModel::new(
                PLATFORM_AS_A_SERVICE,
                "Platform as a Service",
                &[PlatformUsage, Consulting],
            ),
            EngagementModel::new(AGGREGATOR, "Aggregator", &[PlatformUsage]),
        ] {
            models.insert(model.id.clone(), model);
        }
        EngagementModelRegistry { models }
    }

    /// Add a model, replacing any model registered under the same id.
    pub fn register(&mut self, model: EngagementModel) -> PricingResult<()> {
        validate_model(&model)?;
        debug!(id = %model.id, components = ?model.components, "registered engagement model");
        self.models.insert(model.id.clone(), model);
        Ok(())
    }

    pub fn get(&self, id: &EngagementModelId) -> PricingResult<&EngagementModel> {
        self.models
            .get(id)
            .ok_or_else(|| PricingError::not_found("engagement model", id.as_str()))
    }

    /// Lookup by display name, for callers that only hold the name.
    pub fn find_by_name(&self, name: &str) -> PricingResult<&EngagementModel> {
        self.models
            .values()
            .find(|m| m.name == name)
            .ok_or_else(|| PricingError::not_found("engagement model", name))
    }

    pub fn contains(&self, id: &EngagementModelId) -> bool {
        self.models.contains_key(id)
    }

    pub fn models(&self) -> impl Iterator<Item = &EngagementModel> {
        self.models.values()
    }

    /// Total fee for the given model. Unregistered models are an error.
    pub fn compute_total(
        &self,
        id: &EngagementModelId,
        components: &FeeComponents,
    ) -> PricingResult<Money> {
        let model = self.get(id)?;
        let total = model.total(components)?;
        debug!(model = %model.id, %total, "computed engagement model total");
        Ok(total)
    }
}

fn validate_model(model: &EngagementModel) -> PricingResult<()> {
    let mut errors = Vec::new();
    if model.id.as_str().trim().is_empty() {
        errors.push("Engagement model id must not be empty".to_string());
    }
    if model.name.trim().is_empty() {
        errors.push(format!("Engagement model '{}' has no name", model.id));
    }
    if !model.includes(FeeComponent::PlatformUsage) {
        errors.push(format!(
            "Engagement model '{}' must include the platform usage fee",
            model.id
        ));
    }
    for (i, c) in model.components.iter().enumerate() {
        if model.components[..i].contains(c) {
            errors.push(format!(
                "Engagement model '{}' lists component '{}' more than once",
                model.id, c
            ));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PricingError::Configuration(errors))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn components() -> FeeComponents {
        FeeComponents {
            platform_usage_fee: dec!(1000),
            management_fee: dec!(750),
            consulting_fee: dec!(600),
        }
    }

    fn total_for(id: &str) -> Money {
        EngagementModelRegistry::standard()
            .compute_total(&EngagementModelId::new(id), &components())
            .unwrap()
    }

    #[test]
    fn test_market_place_total() {
        assert_eq!(total_for(MARKET_PLACE), dec!(1750));
    }

    #[test]
    fn test_market_place_aggregator_total() {
        assert_eq!(total_for(MARKET_PLACE_AGGREGATOR), dec!(2350));
    }

    #[test]
    fn test_platform_as_a_service_total() {
        assert_eq!(total_for(PLATFORM_AS_A_SERVICE), dec!(1600));
    }

    #[test]
    fn test_aggregator_is_platform_fee_only() {
        assert_eq!(total_for(AGGREGATOR), dec!(1000));
    }

    #[test]
    fn test_unknown_model_fails_loudly() {
        let registry = EngagementModelRegistry::standard();
        let err = registry
            .compute_total(&EngagementModelId::new("bespoke"), &components())
            .unwrap_err();
        match err {
            PricingError::NotFound { kind, key } => {
                assert_eq!(kind, "engagement model");
                assert_eq!(key, "bespoke");
            }
            other => panic!("Expected NotFound, got: {other}"),
        }
    }

    #[test]
    fn test_find_by_display_name() {
        let registry = EngagementModelRegistry::standard();
        let model = registry.find_by_name("Market Place & Aggregator").unwrap();
        assert_eq!(model.id.as_str(), MARKET_PLACE_AGGREGATOR);
        assert!(registry.find_by_name("market place").is_err());
    }

    #[test]
    fn test_register_new_model() {
        let mut registry = EngagementModelRegistry::standard();
        registry
            .register(EngagementModel::new(
                "consulting_only_plus",
                "Consulting Plus",
                &[FeeComponent::PlatformUsage, FeeComponent::Consulting],
            ))
            .unwrap();
        let total = registry
            .compute_total(&EngagementModelId::new("consulting_only_plus"), &components())
            .unwrap();
        assert_eq!(total, dec!(1600));
    }

    #[test]
    fn test_register_without_platform_fee_rejected() {
        let mut registry = EngagementModelRegistry::empty();
        let err = registry
            .register(EngagementModel::new(
                "mgmt_only",
                "Management Only",
                &[FeeComponent::Management],
            ))
            .unwrap_err();
        assert!(matches!(err, PricingError::Configuration(ref msgs) if msgs.len() == 1));
    }

    #[test]
    fn test_register_duplicate_component_rejected() {
        let mut registry = EngagementModelRegistry::empty();
        let err = registry.register(EngagementModel::new(
            "double",
            "Double",
            &[FeeComponent::PlatformUsage, FeeComponent::PlatformUsage],
        ));
        assert!(err.is_err());
    }

    #[test]
    fn test_component_keys_serialize_snake_case() {
        let json = serde_json::to_string(&FeeComponent::PlatformUsage).unwrap();
        assert_eq!(json, "\"platform_usage\"");
    }
}
