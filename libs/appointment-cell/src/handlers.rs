// libs/appointment-cell/src/handlers.rs
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use shared_database::Document;
use shared_models::auth::AuthenticatedUser;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{AppointmentOption, BookingOutcome, Specialty};
use crate::services::{AvailabilityService, BookingService};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookingsQuery {
    pub email: Option<String>,
}

// ==============================================================================
// APPOINTMENT OPTIONS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_appointment_options(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<AppointmentOption>>, AppError> {
    let options = AvailabilityService::new(&state)
        .available_options(query.date.as_deref())
        .await?;

    Ok(Json(options))
}

#[axum::debug_handler]
pub async fn get_appointment_specialties(
    State(state): State<AppState>,
) -> Result<Json<Vec<Specialty>>, AppError> {
    let specialties = AvailabilityService::new(&state).specialties().await?;
    Ok(Json(specialties))
}

// ==============================================================================
// BOOKINGS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(booking): Json<Document>,
) -> Result<Json<BookingOutcome>, AppError> {
    let outcome = BookingService::new(&state).create_booking(booking).await?;
    Ok(Json(outcome))
}

#[axum::debug_handler]
pub async fn get_user_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let bookings = BookingService::new(&state)
        .bookings_for_user(query.email.as_deref(), &user)
        .await?;

    Ok(Json(bookings))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Option<Document>>, AppError> {
    let booking = BookingService::new(&state).booking_by_id(&booking_id).await?;
    Ok(Json(booking))
}
