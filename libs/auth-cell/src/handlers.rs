use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::state::AppState;
use shared_utils::validation::require_non_empty;

use crate::services::TokenService;

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub email: Option<String>,
}

/// `GET /jwt?email=` answers 403 with an empty token when no user matches.
#[axum::debug_handler]
pub async fn issue_token(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let email = require_non_empty("email", query.email.as_deref())?;

    let response = match TokenService::new(&state).issue_for(&email).await? {
        Some(access_token) => (StatusCode::OK, Json(TokenResponse { access_token })),
        None => (
            StatusCode::FORBIDDEN,
            Json(TokenResponse {
                access_token: String::new(),
            }),
        ),
    };

    Ok(response)
}
