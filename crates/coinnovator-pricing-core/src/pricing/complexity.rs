use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PricingError;
use crate::types::*;
use crate::PricingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Administrator-maintained complexity tier. Scales the flat management and
/// consulting fees of a formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityLevel {
    pub id: ComplexityLevelId,
    /// Unique display name, matched exactly ("Low", "Medium", "High")
    pub name: String,
    pub management_fee_multiplier: Multiple,
    pub consulting_fee_multiplier: Multiple,
    #[serde(default)]
    pub sort_order: i32,
}

/// The multiplier pair applied to a formula's base fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityMultipliers {
    pub management_fee_multiplier: Multiple,
    pub consulting_fee_multiplier: Multiple,
}

impl ComplexityMultipliers {
    /// 1x on both fees.
    pub const UNIT: ComplexityMultipliers = ComplexityMultipliers {
        management_fee_multiplier: Decimal::ONE,
        consulting_fee_multiplier: Decimal::ONE,
    };
}

impl From<&ComplexityLevel> for ComplexityMultipliers {
    fn from(level: &ComplexityLevel) -> Self {
        ComplexityMultipliers {
            management_fee_multiplier: level.management_fee_multiplier,
            consulting_fee_multiplier: level.consulting_fee_multiplier,
        }
    }
}

/// Immutable lookup of complexity levels by name.
#[derive(Debug, Clone, Default)]
pub struct ComplexityTable {
    levels: Vec<ComplexityLevel>,
    by_name: HashMap<String, usize>,
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

impl ComplexityTable {
    /// Build a table, rejecting negative multipliers and duplicate names.
    /// Levels are kept in `sort_order`.
    pub fn new(mut levels: Vec<ComplexityLevel>) -> PricingResult<Self> {
        for level in &levels {
            validate_level(level)?;
        }
        levels.sort_by_key(|l| l.sort_order);

        let mut by_name = HashMap::with_capacity(levels.len());
        let mut duplicates = Vec::new();
        for (idx, level) in levels.iter().enumerate() {
            if by_name.insert(level.name.clone(), idx).is_some() {
                duplicates.push(format!("Duplicate complexity level name '{}'", level.name));
            }
        }
        if !duplicates.is_empty() {
            return Err(PricingError::Configuration(duplicates));
        }

        Ok(ComplexityTable { levels, by_name })
    }

    /// Resolve a level name to its multipliers. Case-sensitive exact match.
    pub fn resolve(&self, name: &str) -> PricingResult<ComplexityMultipliers> {
        let level = self
            .get(name)
            .ok_or_else(|| PricingError::not_found("complexity level", name))?;
        debug!(
            name = %level.name,
            management = %level.management_fee_multiplier,
            consulting = %level.consulting_fee_multiplier,
            "resolved complexity level"
        );
        Ok(ComplexityMultipliers::from(level))
    }

    pub fn get(&self, name: &str) -> Option<&ComplexityLevel> {
        self.by_name.get(name).map(|&idx| &self.levels[idx])
    }

    /// Levels in ascending `sort_order`.
    pub fn levels(&self) -> &[ComplexityLevel] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

fn validate_level(level: &ComplexityLevel) -> PricingResult<()> {
    if level.name.trim().is_empty() {
        return Err(PricingError::InvalidArgument {
            field: format!("complexity_level:{}", level.id),
            reason: "Complexity level name must not be empty".into(),
        });
    }
    ensure_non_negative("management_fee_multiplier", level.management_fee_multiplier)?;
    ensure_non_negative("consulting_fee_multiplier", level.consulting_fee_multiplier)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
