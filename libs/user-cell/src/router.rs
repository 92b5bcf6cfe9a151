use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::state::AppState;

use crate::handlers::*;

// Both admin routes share one pattern: GET reads it as an email, PUT as a user id.
pub fn user_routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/admin/{key}", get(check_admin));

    let protected_routes = Router::new()
        .route("/users/admin/{key}", put(promote_to_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
