use axum::{extract::FromRequestParts, http::request::Parts};
use serde_json::Value;
use tracing::warn;

use shared_database::{collections, DocumentStore, Filter, StoreError};
use shared_models::auth::AuthenticatedUser;
use shared_models::error::AppError;

use crate::state::AppState;

pub const ADMIN_ROLE: &str = "admin";

/// True iff a user with this email exists and its role is exactly "admin".
pub async fn is_admin(store: &dyn DocumentStore, email: &str) -> Result<bool, StoreError> {
    let user = store
        .find_one(collections::USERS, &Filter::new().eq("email", email))
        .await?;

    Ok(user
        .and_then(|user| user.get("role").cloned())
        .is_some_and(|role| role == Value::String(ADMIN_ROLE.to_string())))
}

/// Proof that a verified identity holds the admin role. Only obtainable from an
/// [`AuthenticatedUser`], so an admin check cannot run ahead of authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub email: String,
}

impl AdminUser {
    pub async fn require(store: &dyn DocumentStore, user: &AuthenticatedUser) -> Result<Self, AppError> {
        if !is_admin(store, &user.email).await? {
            warn!("Admin access refused for {}", user.email);
            return Err(AppError::Forbidden("forbidden access".to_string()));
        }

        Ok(Self {
            email: user.email.clone(),
        })
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        AdminUser::require(state.store.as_ref(), &user).await
    }
}
