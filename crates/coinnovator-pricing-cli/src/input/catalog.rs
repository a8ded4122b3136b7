use coinnovator_pricing_core::catalog::{CatalogConfig, PricingCatalog};
use tracing::debug;

use super::file;

/// Load a pricing catalog from a JSON or YAML file (by extension).
pub fn load_catalog(path: &str) -> Result<PricingCatalog, Box<dyn std::error::Error>> {
    let (resolved, contents) = file::read_text(path)?;
    let is_yaml = resolved
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let config: CatalogConfig = if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", resolved.display(), e))?
    };
    debug!(
        path = %resolved.display(),
        formulas = config.formulas.len(),
        "read catalog document"
    );

    Ok(PricingCatalog::from_config(config)?)
}
