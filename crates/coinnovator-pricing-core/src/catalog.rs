//! Load-time resolution of pricing reference data.
//!
//! A [`CatalogConfig`] is the document an administrator maintains: complexity
//! levels, any engagement models beyond the standard four, and the formulas.
//! [`PricingCatalog::from_config`] checks the whole document once (every
//! formula valid, every engagement model reference resolvable, at most one
//! active formula per model and country) so that quoting never has to
//! re-match loosely related rows.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PricingError;
use crate::pricing::calculator::{
    calculate_breakdown, formula_assumptions, FeeBreakdown, MissingComplexityPolicy,
    PricingContext,
};
use crate::pricing::complexity::{ComplexityLevel, ComplexityTable};
use crate::pricing::engagement::{EngagementModel, EngagementModelRegistry};
use crate::pricing::formula::FormulaConfig;
use crate::pricing::validation::validate_formula;
use crate::types::*;
use crate::PricingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub complexity_levels: Vec<ComplexityLevel>,
    /// Added to the standard models; an entry with a standard id replaces it
    #[serde(default)]
    pub engagement_models: Vec<EngagementModel>,
    #[serde(default)]
    pub formulas: Vec<FormulaConfig>,
    #[serde(default)]
    pub missing_complexity: MissingComplexityPolicy,
}

/// A quote against the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub engagement_model_id: EngagementModelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub complexity_level: String,
    pub base_fee: Money,
    #[serde(default)]
    pub is_active_member: bool,
}

/// Summary of a loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub complexity_levels: Vec<String>,
    pub engagement_models: Vec<EngagementModelId>,
    pub formulas: usize,
    pub active_formulas: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FormulaKey {
    model: EngagementModelId,
    country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PricingCatalog {
    complexity: ComplexityTable,
    models: EngagementModelRegistry,
    formulas: BTreeMap<FormulaId, FormulaConfig>,
    active: HashMap<FormulaKey, FormulaId>,
    missing_complexity: MissingComplexityPolicy,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl PricingCatalog {
    pub fn from_config(config: CatalogConfig) -> PricingResult<Self> {
        let complexity = ComplexityTable::new(config.complexity_levels)?;

        let mut models = EngagementModelRegistry::standard();
        for model in config.engagement_models {
            models.register(model)?;
        }

        let mut errors: Vec<String> = Vec::new();
        let mut formulas = BTreeMap::new();
        let mut active: HashMap<FormulaKey, FormulaId> = HashMap::new();

        for formula in config.formulas {
            let validation = validate_formula(&formula);
            errors.extend(
                validation
                    .errors
                    .into_iter()
                    .map(|e| format!("formula '{}': {}", formula.id, e)),
            );

            if let Some(model_id) = &formula.engagement_model_id {
                if !model_id.as_str().trim().is_empty() && !models.contains(model_id) {
                    return Err(PricingError::not_found("engagement model", model_id.as_str()));
                }
                if formula.is_active {
                    let key = FormulaKey {
                        model: model_id.clone(),
                        country: formula.country.clone(),
                    };
                    if let Some(existing) = active.insert(key, formula.id.clone()) {
                        errors.push(format!(
                            "formulas '{}' and '{}' are both active for engagement model '{}' ({})",
                            existing,
                            formula.id,
                            model_id,
                            formula.country.as_deref().unwrap_or("all countries"),
                        ));
                    }
                }
            }

            if formulas.contains_key(&formula.id) {
                errors.push(format!("duplicate formula id '{}'", formula.id));
            }
            formulas.insert(formula.id.clone(), formula);
        }

        if !errors.is_empty() {
            return Err(PricingError::Configuration(errors));
        }

        info!(
            complexity_levels = complexity.len(),
            formulas = formulas.len(),
            active_formulas = active.len(),
            "loaded pricing catalog"
        );

        Ok(PricingCatalog {
            complexity,
            models,
            formulas,
            active,
            missing_complexity: config.missing_complexity,
        })
    }

    /// Parse and load a JSON catalog document.
    pub fn from_json(json: &str) -> PricingResult<Self> {
        let config: CatalogConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    pub fn complexity(&self) -> &ComplexityTable {
        &self.complexity
    }

    pub fn models(&self) -> &EngagementModelRegistry {
        &self.models
    }

    pub fn formula(&self, id: &FormulaId) -> PricingResult<&FormulaConfig> {
        self.formulas
            .get(id)
            .ok_or_else(|| PricingError::not_found("formula", id.as_str()))
    }

    /// Active formula for the model in `country`, falling back to the
    /// model's country-less formula.
    pub fn formula_for(
        &self,
        model_id: &EngagementModelId,
        country: Option<&str>,
    ) -> PricingResult<&FormulaConfig> {
        self.models.get(model_id)?;

        let exact = country.and_then(|c| {
            self.active.get(&FormulaKey {
                model: model_id.clone(),
                country: Some(c.to_string()),
            })
        });
        let id = exact
            .or_else(|| {
                self.active.get(&FormulaKey {
                    model: model_id.clone(),
                    country: None,
                })
            })
            .ok_or_else(|| {
                let key = match country {
                    Some(c) => format!("{model_id} / {c}"),
                    None => model_id.to_string(),
                };
                PricingError::not_found("formula", key)
            })?;
        debug!(model = %model_id, country, formula = %id, "resolved formula");
        self.formula(id)
    }

    pub fn context(&self) -> PricingContext<'_> {
        PricingContext {
            complexity: &self.complexity,
            models: &self.models,
            missing_complexity: self.missing_complexity,
        }
    }

    /// Price a challenge with the formula configured for its model and country.
    pub fn quote(&self, request: &QuoteRequest) -> PricingResult<ComputationOutput<FeeBreakdown>> {
        let start = Instant::now();
        let mut warnings: Vec<String> = Vec::new();

        let formula = self.formula_for(&request.engagement_model_id, request.country.as_deref())?;
        if let (Some(wanted), None) = (&request.country, &formula.country) {
            warnings.push(format!(
                "No formula configured for '{wanted}'; using the default formula '{}'",
                formula.id
            ));
        }

        let output = calculate_breakdown(
            &self.context(),
            formula,
            request.base_fee,
            &request.complexity_level,
            request.is_active_member,
            &mut warnings,
        )?;

        let elapsed = start.elapsed().as_micros() as u64;
        Ok(with_metadata(
            "Challenge Pricing: catalog quote",
            &formula_assumptions(formula, request.base_fee, &request.complexity_level),
            warnings,
            elapsed,
            output,
        ))
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            complexity_levels: self
                .complexity
                .levels()
                .iter()
                .map(|l| l.name.clone())
                .collect(),
            engagement_models: self.models.models().map(|m| m.id.clone()).collect(),
            formulas: self.formulas.len(),
            active_formulas: self.active.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
