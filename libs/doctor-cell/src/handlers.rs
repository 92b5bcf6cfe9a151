use axum::{
    extract::{Path, State},
    Json,
};

use shared_database::{DeleteResult, Document, InsertResult};
use shared_models::error::AppError;
use shared_utils::access::AdminUser;
use shared_utils::state::AppState;

use crate::services::DoctorService;

// ==============================================================================
// ADMIN-ONLY DOCTOR DIRECTORY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<Vec<Document>>, AppError> {
    let doctors = DoctorService::new(&state).list_doctors(&admin).await?;
    Ok(Json(doctors))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(doctor): Json<Document>,
) -> Result<Json<InsertResult>, AppError> {
    let result = DoctorService::new(&state).create_doctor(doctor, &admin).await?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(doctor_id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let result = DoctorService::new(&state).delete_doctor(&doctor_id, &admin).await?;
    Ok(Json(result))
}
