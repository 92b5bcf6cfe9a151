use axum::{
    extract::{Path, State},
    Json,
};

use shared_database::{Document, InsertResult, UpdateResult};
use shared_models::error::AppError;
use shared_utils::access::AdminUser;
use shared_utils::state::AppState;

use crate::models::AdminStatus;
use crate::services::UserService;

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<Document>,
) -> Result<Json<InsertResult>, AppError> {
    let result = UserService::new(&state).create_user(user).await?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let users = UserService::new(&state).list_users().await?;
    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn check_admin(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>, AppError> {
    let is_admin = UserService::new(&state).is_admin(&email).await?;
    Ok(Json(AdminStatus { is_admin }))
}

#[axum::debug_handler]
pub async fn promote_to_admin(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    let result = UserService::new(&state).promote_to_admin(&user_id, &admin).await?;
    Ok(Json(result))
}
