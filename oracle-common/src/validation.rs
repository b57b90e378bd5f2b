//! Configuration validation.

use thiserror::Error;

use crate::config::{Config, NarrationConfig, NarrationProvider, ObservabilityConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

impl From<ValidationError> for crate::error::Error {
    fn from(err: ValidationError) -> Self {
        crate::error::Error::Config(err.to_string())
    }
}

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["json", "pretty"];

impl Validate for Config {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = validate_endpoint(&self.endpoint) {
            errors.push(e);
        }
        if self.timeout_secs == Some(0) {
            errors.push(ValidationError::InvalidValue {
                field: "timeout_secs".into(),
                reason: "must be greater than zero when set".into(),
            });
        }
        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }
        if let Err(e) = self.narration.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

fn validate_endpoint(endpoint: &str) -> ValidationResult<()> {
    let parsed = url::Url::parse(endpoint).map_err(|e| ValidationError::InvalidValue {
        field: "endpoint".into(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ValidationError::InvalidValue {
            field: "endpoint".into(),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            });
        }
        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("expected one of {}", LOG_FORMATS.join(", ")),
            });
        }
        Ok(())
    }
}

impl Validate for NarrationConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.provider == NarrationProvider::Speech
            && self.api_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(ValidationError::MissingField {
                field: "narration.api_key".into(),
            });
        }
        if let Some(base_url) = &self.base_url {
            url::Url::parse(base_url).map_err(|e| ValidationError::InvalidValue {
                field: "narration.base_url".into(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}
