use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Not found: {kind} '{key}'")]
    NotFound { kind: String, key: String },

    #[error("Invalid argument: {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Configuration error: {}", .0.join("; "))]
    Configuration(Vec<String>),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PricingError {
    pub(crate) fn not_found(kind: &str, key: impl Into<String>) -> Self {
        PricingError::NotFound {
            kind: kind.to_string(),
            key: key.into(),
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        PricingError::InvalidArgument {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(e: serde_json::Error) -> Self {
        PricingError::Serialization(e.to_string())
    }
}
