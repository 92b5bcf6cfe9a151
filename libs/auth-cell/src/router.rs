use axum::{routing::get, Router};

use shared_utils::state::AppState;

use crate::handlers;

pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/jwt", get(handlers::issue_token))
        .with_state(state)
}
