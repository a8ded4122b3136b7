use clap::Args;
use serde_json::Value;

use coinnovator_pricing_core::pricing::engagement::EngagementModelRegistry;

use crate::input;

/// Arguments for commands that read a pricing catalog
#[derive(Args)]
pub struct CatalogArgs {
    /// Catalog file (JSON or YAML)
    #[arg(long, env = "COINNOVATOR_CATALOG")]
    pub catalog: Option<String>,
}

pub fn run_validate_catalog(args: CatalogArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let path = args
        .catalog
        .ok_or("--catalog <file> (or COINNOVATOR_CATALOG) required for validate-catalog")?;
    let catalog = input::catalog::load_catalog(&path)?;
    Ok(serde_json::json!({ "result": catalog.summary() }))
}

/// List engagement models and the fee lines each one charges. Without a
/// catalog, lists the standard models.
pub fn run_models(args: CatalogArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = match args.catalog {
        Some(path) => Some(input::catalog::load_catalog(&path)?),
        None => None,
    };
    let standard = EngagementModelRegistry::standard();
    let registry = catalog.as_ref().map_or(&standard, |c| c.models());

    let rows: Vec<Value> = registry
        .models()
        .map(|m| {
            serde_json::json!({
                "id": m.id,
                "name": m.name,
                "components": m
                    .components
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" + "),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}
