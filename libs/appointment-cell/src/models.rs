// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use shared_database::{InsertResult, StoreError};
use shared_models::error::AppError;
use shared_utils::validation::ValidationError;

/// A bookable treatment. Fields beyond the known ones pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentOption {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Number>,
    #[serde(default)]
    pub slots: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Name-only projection served by `/appointmentspecialty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialty {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl From<AppointmentOption> for Specialty {
    fn from(option: AppointmentOption) -> Self {
        Self {
            id: option.id,
            name: option.name,
        }
    }
}

/// A stored booking as read back for slot accounting. Patient details live in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub appointment_date: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub treatment_name: Option<String>,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The fields that make a booking unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingKey {
    pub appointment_date: String,
    pub email: String,
    pub treatment_name: String,
}

/// Result of a booking attempt. A duplicate is a normal answer, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingOutcome {
    Created(InsertResult),
    AlreadyBooked { acknowledged: bool, message: String },
}

impl BookingOutcome {
    pub fn already_booked(appointment_date: &str) -> Self {
        BookingOutcome::AlreadyBooked {
            acknowledged: false,
            message: format!("you already have an appointment on {}", appointment_date),
        }
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("forbidden")]
    IdentityMismatch,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Stored booking is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(e) => e.into(),
            BookingError::IdentityMismatch => AppError::Forbidden("forbidden".to_string()),
            BookingError::Store(e) => e.into(),
            BookingError::Malformed(e) => AppError::Database(e.to_string()),
        }
    }
}
