// libs/appointment-cell/src/router.rs
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;
use shared_utils::state::AppState;

use crate::handlers;

pub fn appointment_routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/appointmentoptions", get(handlers::get_appointment_options))
        .route("/appointmentspecialty", get(handlers::get_appointment_specialties))
        .route("/bookings", post(handlers::create_booking))
        .route("/bookings/{id}", get(handlers::get_booking));

    let protected_routes = Router::new()
        .route("/bookings", get(handlers::get_user_bookings))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
