use serde_json::Value;
use thiserror::Error;

use shared_models::error::AppError;

/// Input rejected before any business logic runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::ValidationError(err.0)
    }
}

/// Returns the trimmed-non-empty string held by `field`.
pub fn require_string<'a>(document: &'a serde_json::Map<String, Value>, field: &str) -> Result<&'a str, ValidationError> {
    match document.get(field) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value),
        Some(Value::String(_)) | None | Some(Value::Null) => {
            Err(ValidationError(format!("{} is required", field)))
        }
        Some(_) => Err(ValidationError(format!("{} must be a string", field))),
    }
}

/// Returns `value` exactly as given once it is known to hold more than whitespace.
pub fn require_non_empty(field: &str, value: Option<&str>) -> Result<String, ValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(ValidationError(format!("{} is required", field))),
    }
}

pub fn require_positive_amount(field: &str, value: &Value) -> Result<f64, ValidationError> {
    match value.as_f64() {
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(ValidationError(format!("{} must be a positive number", field))),
    }
}
