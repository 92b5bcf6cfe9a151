use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;
use shared_utils::validation::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentRequest {
    #[serde(default)]
    pub price: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// The subset of Stripe's PaymentIntent object this service reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment provider is not configured")]
    NotConfigured,

    #[error("Payment provider error: {message}")]
    ProviderError { message: String },

    #[error("Payment provider unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Booking {0} not found")]
    BookingNotFound(String),

    #[error("Booking {0} belongs to another user")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Validation(e) => e.into(),
            PaymentError::BookingNotFound(id) => AppError::NotFound(format!("Booking {} not found", id)),
            PaymentError::Forbidden(_) => AppError::Forbidden("forbidden access".to_string()),
            PaymentError::Store(e) => e.into(),
            other => AppError::ExternalService(other.to_string()),
        }
    }
}

/// Converts a price in base currency units to minor units (cents).
pub fn to_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_cents_without_float_drift() {
        assert_eq!(to_minor_units(65.0), 6500);
        assert_eq!(to_minor_units(19.99), 1999);
        assert_eq!(to_minor_units(0.1 + 0.2), 30);
    }
}
