use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use shared_models::auth::AuthenticatedUser;
use shared_models::error::AppError;

use crate::jwt::validate_token;
use crate::state::AppState;

/// The token is the second whitespace-separated segment of the header value,
/// whatever the scheme in front of it.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.split_whitespace().nth(1)
}

// Missing header is 401; anything that fails verification is 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("unauthorized access".to_string()))?;

    let token = auth_header
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or_else(|| AppError::Forbidden("forbidden".to_string()))?;

    let claims = validate_token(token, &state.config.access_token_secret)
        .map_err(|_| AppError::Forbidden("forbidden".to_string()))?;

    debug!("Authenticated request for {}", claims.email);
    request.extensions_mut().insert(AuthenticatedUser::from(claims));

    Ok(next.run(request).await)
}
