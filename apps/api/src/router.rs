use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use payment_cell::router::payment_routes;
use payment_cell::PaymentGateway;
use shared_utils::state::AppState;
use user_cell::router::user_routes;

pub fn create_router(state: AppState, gateway: Arc<dyn PaymentGateway>) -> Router {
    Router::new()
        .route("/", get(|| async { "Doctors portal server is running" }))
        .merge(auth_routes(state.clone()))
        .merge(appointment_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(payment_routes(state, gateway))
}
