use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::state::AppState;

use crate::handlers;

pub fn doctor_routes(state: AppState) -> Router {
    // Every doctor route requires an authenticated admin
    let protected_routes = Router::new()
        .route("/doctors", get(handlers::list_doctors).post(handlers::create_doctor))
        .route("/doctors/{doctor_id}", delete(handlers::delete_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
